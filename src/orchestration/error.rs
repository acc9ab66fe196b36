use crate::orchestration::transitions::NodeId;
use crate::shared::errors::ErrorKind;

/// Engine invariant breaches. These surface as an error state on the run,
/// never as a panic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("workflow exceeded {limit} node visits without reaching terminal (last node `{last}`)")]
    NodeVisitLimit { limit: usize, last: NodeId },
    #[error("workflow reached terminal without an output status")]
    MissingStatus,
    #[error("instruction given but no instruction translator is configured")]
    MissingTranslator,
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingTranslator => ErrorKind::Parse,
            _ => ErrorKind::Workflow,
        }
    }
}
