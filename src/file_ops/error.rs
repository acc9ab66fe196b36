use crate::orchestration::workspace_access::PolicyError;
use crate::shared::errors::{io_kind, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum FileOpError {
    #[error("`{path}` does not exist")]
    NotFound { path: String },
    #[error("`{path}` is a directory{hint}")]
    IsDirectory { path: String, hint: &'static str },
    #[error("`{path}` is not a directory")]
    NotADirectory { path: String },
    #[error("`{path}` already exists")]
    AlreadyExists { path: String },
    #[error("`{path}` is {size} bytes, over the {limit} byte limit")]
    TooLarge { path: String, size: u64, limit: u64 },
    #[error("cannot move `{from}` into itself at `{to}`")]
    IntoItself { from: String, to: String },
    #[error("`{operation}` is not a file operation; run it as a search")]
    Unsupported { operation: String },
    #[error("`{operation}` requires `{argument}`")]
    MissingArgument {
        operation: String,
        argument: &'static str,
    },
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error("failed to {operation} `{path}`: {source}")]
    Io {
        operation: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FileOpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::IsDirectory { .. } => ErrorKind::IsDirectory,
            Self::NotADirectory { .. } => ErrorKind::NotADirectory,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::IntoItself { .. } | Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::MissingArgument { .. } => ErrorKind::Parse,
            Self::Policy(_) => ErrorKind::Policy,
            Self::Io { source, .. } => io_kind(source),
        }
    }
}
