pub mod pattern;

pub use pattern::NamePattern;

use crate::orchestration::workspace_access::{PathGuard, PolicyError};
use crate::shared::errors::{io_kind, ErrorKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::UNIX_EPOCH;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search pattern `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: String },
    #[error("search root `{path}` does not exist")]
    NotFound { path: String },
    #[error("search root `{path}` is not a directory")]
    NotADirectory { path: String },
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error("failed to inspect search root `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Pattern { .. } => ErrorKind::Pattern,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotADirectory { .. } => ErrorKind::NotADirectory,
            Self::Policy(_) => ErrorKind::Policy,
            Self::Io { source, .. } => io_kind(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub modified: String,
}

/// Walk limits. `max_depth` counts levels below the search root (files
/// directly inside the root are depth 1); `None` is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_depth: Option<usize>,
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    guard: PathGuard,
    options: SearchOptions,
}

impl SearchEngine {
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Every file under `root_path` whose name fully matches `pattern`, in
    /// walk order with siblings sorted by name. No matches is not an error.
    pub fn search(&self, root_path: &str, pattern: &str) -> Result<Vec<SearchResult>, SearchError> {
        let matcher = NamePattern::compile(pattern)?;
        let root = self.guard.resolve(root_path)?;
        let shown = self.guard.display_path(&root);
        match fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(SearchError::NotADirectory { path: shown }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(SearchError::NotFound { path: shown })
            }
            Err(source) => return Err(SearchError::Io { path: shown, source }),
        }

        let mut walker = WalkDir::new(&root).follow_links(false).sort_by_file_name();
        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut results = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry))
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !matcher.is_match(&name) {
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            let modified: DateTime<Utc> = meta.modified().unwrap_or(UNIX_EPOCH).into();
            results.push(SearchResult {
                name: name.into_owned(),
                path: entry.path().display().to_string(),
                size: meta.len(),
                modified: modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            });
        }
        Ok(results)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .options
                .exclude_dirs
                .iter()
                .any(|dir| entry.file_name().to_str() == Some(dir.as_str()))
    }
}
