use serde::{Deserialize, Serialize};

/// Failure classes every component error is normalised onto before it is
/// written into a workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    IsDirectory,
    NotADirectory,
    AlreadyExists,
    Policy,
    Pattern,
    Parse,
    TooLarge,
    Unsupported,
    Io,
    Workflow,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::IsDirectory => "is_directory",
            Self::NotADirectory => "not_a_directory",
            Self::AlreadyExists => "already_exists",
            Self::Policy => "policy",
            Self::Pattern => "pattern",
            Self::Parse => "parse",
            Self::TooLarge => "too_large",
            Self::Unsupported => "unsupported",
            Self::Io => "io",
            Self::Workflow => "workflow",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub(crate) fn io_kind(source: &std::io::Error) -> ErrorKind {
    match source.kind() {
        std::io::ErrorKind::NotFound => ErrorKind::NotFound,
        std::io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
        _ => ErrorKind::Io,
    }
}
