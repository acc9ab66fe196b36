use crate::orchestration::command::CommandInput;
use crate::orchestration::state::WorkflowState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Init,
    Parse,
    FileOps,
    Search,
    Terminal,
}

impl NodeId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Parse => "parse",
            Self::FileOps => "file_ops",
            Self::Search => "search",
            Self::Terminal => "terminal",
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Routing looks only at `type`. Anything other than `search`, including a
/// missing or unknown type, goes to file operations.
pub fn route_input(input: &CommandInput) -> NodeId {
    if input.is_search() {
        NodeId::Search
    } else {
        NodeId::FileOps
    }
}

pub fn next_node(current: NodeId, state: &WorkflowState) -> NodeId {
    match current {
        NodeId::Init if state.has_instruction() => NodeId::Parse,
        NodeId::Init => route_input(&state.input),
        NodeId::Parse if state.is_error() => NodeId::Terminal,
        NodeId::Parse => route_input(&state.input),
        NodeId::FileOps | NodeId::Search | NodeId::Terminal => NodeId::Terminal,
    }
}
