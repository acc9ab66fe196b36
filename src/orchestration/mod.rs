pub mod command;
pub mod command_parser;
pub mod error;
pub mod nodes;
pub mod state;
pub mod transitions;
pub mod workflow_engine;
pub mod workspace_access;

pub use command::{Command, CommandInput, CommandKind, CommandType};
pub use command_parser::{CommandParseError, CommandParser};
pub use error::WorkflowError;
pub use state::{OutputStatus, WorkflowOutput, WorkflowState};
pub use transitions::{next_node, route_input, NodeId};
pub use workflow_engine::{run_workflow, WorkflowEngine, WorkflowRun};
pub use workspace_access::{ExtensionRule, PathGuard, PolicyError};
