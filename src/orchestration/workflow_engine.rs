use crate::config::Settings;
use crate::file_ops::FileOperations;
use crate::orchestration::error::WorkflowError;
use crate::orchestration::nodes::{run_node, NodeContext};
use crate::orchestration::state::WorkflowState;
use crate::orchestration::transitions::{next_node, NodeId};
use crate::orchestration::workspace_access::{PathGuard, PolicyError};
use crate::provider::InstructionTranslator;
use crate::search::{SearchEngine, SearchOptions};
use crate::shared::logging::{AgentLog, LogLevel};
use std::sync::Arc;

/// Upper bound on node visits per run. A well-formed run visits at most four
/// nodes; hitting this means the transition table is broken.
pub const DEFAULT_MAX_NODE_VISITS: usize = 16;

/// Final state plus the nodes visited, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub state: WorkflowState,
    pub path: Vec<NodeId>,
}

/// Drives runs through init, optional parse, one work node and terminal.
///
/// The engine holds no per-run state, so one instance can serve runs on
/// several threads at once.
#[derive(Clone)]
pub struct WorkflowEngine {
    file_ops: FileOperations,
    search: SearchEngine,
    translator: Option<Arc<dyn InstructionTranslator>>,
    log: Option<AgentLog>,
    max_node_visits: usize,
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("root", &self.file_ops.guard().root())
            .field("translator", &self.translator.is_some())
            .field("log", &self.log.as_ref().map(AgentLog::path))
            .field("max_node_visits", &self.max_node_visits)
            .finish()
    }
}

impl WorkflowEngine {
    pub fn new(guard: PathGuard) -> Self {
        Self {
            file_ops: FileOperations::new(guard.clone()),
            search: SearchEngine::new(guard),
            translator: None,
            log: None,
            max_node_visits: DEFAULT_MAX_NODE_VISITS,
        }
    }

    /// Guard, limits and log file from settings. The translator is left to
    /// the caller since it needs credentials from the environment.
    pub fn from_settings(settings: &Settings) -> Result<Self, PolicyError> {
        let guard = PathGuard::from_settings(settings)?;
        let logging = &settings.logging;
        Ok(Self::new(guard)
            .with_max_file_size(settings.file_operations.max_file_size)
            .with_search_options(SearchOptions {
                max_depth: settings.search.max_depth,
                exclude_dirs: settings.search.exclude_dirs.clone(),
            })
            .with_log(AgentLog::new(
                logging.log_file.clone(),
                logging.max_log_size,
                logging.backup_count,
            )))
    }

    pub fn with_translator<T>(mut self, translator: T) -> Self
    where
        T: InstructionTranslator + 'static,
    {
        self.translator = Some(Arc::new(translator));
        self
    }

    pub fn with_shared_translator(mut self, translator: Arc<dyn InstructionTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_log(mut self, log: AgentLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.file_ops = self.file_ops.with_max_file_size(max_file_size);
        self
    }

    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search = self.search.with_options(options);
        self
    }

    pub fn with_max_node_visits(mut self, limit: usize) -> Self {
        self.max_node_visits = limit;
        self
    }

    pub fn guard(&self) -> &PathGuard {
        self.file_ops.guard()
    }

    pub fn run(&self, state: WorkflowState) -> WorkflowState {
        self.run_traced(state).state
    }

    pub fn run_traced(&self, initial: WorkflowState) -> WorkflowRun {
        let ctx = NodeContext {
            file_ops: &self.file_ops,
            search: &self.search,
            translator: self.translator.as_deref(),
        };

        let mut state = initial;
        let mut node = NodeId::Init;
        let mut path = Vec::new();
        loop {
            if path.len() >= self.max_node_visits {
                let err = WorkflowError::NodeVisitLimit {
                    limit: self.max_node_visits,
                    last: node,
                };
                state.record_error(err.kind(), err.to_string());
                self.log(LogLevel::Error, "node_visit_limit", &state.run_id, &err.to_string());
                break;
            }

            path.push(node);
            state = run_node(node, state, &ctx);
            if node == NodeId::Terminal {
                break;
            }
            let next = next_node(node, &state);
            self.log(
                LogLevel::Info,
                "node_transition",
                &state.run_id,
                &format!("run_id={} node={node} next={next}", state.run_id),
            );
            node = next;
        }

        self.log_finished(&state);
        WorkflowRun { state, path }
    }

    fn log_finished(&self, state: &WorkflowState) {
        match state.error.as_deref() {
            Some(error) => self.log(
                LogLevel::Error,
                "run_failed",
                &state.run_id,
                &format!(
                    "run_id={} error_kind={} error={error}",
                    state.run_id,
                    state
                        .output
                        .error_kind
                        .map(|kind| kind.as_str())
                        .unwrap_or("unknown")
                ),
            ),
            None => self.log(
                LogLevel::Info,
                "run_completed",
                &state.run_id,
                &format!(
                    "run_id={} message={}",
                    state.run_id,
                    state.output.message.as_deref().unwrap_or_default()
                ),
            ),
        }
    }

    fn log(&self, level: LogLevel, event: &str, run_id: &str, message: &str) {
        if let Some(log) = &self.log {
            log.append(level, event, run_id, message);
        }
    }
}

/// Runs one workflow to completion. Accepts either an instruction or direct
/// input and always returns a state whose `output.status` is set.
pub fn run_workflow(engine: &WorkflowEngine, initial: WorkflowState) -> WorkflowState {
    engine.run(initial)
}
