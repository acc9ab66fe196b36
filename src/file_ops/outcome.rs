use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Immediate children of a directory, split by kind and sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    pub path: String,
    pub directories: Vec<ListingEntry>,
    pub files: Vec<ListingEntry>,
}

impl DirectoryListing {
    pub fn render(&self) -> String {
        let mut lines = vec![format!("contents of {}:", self.path)];
        if !self.directories.is_empty() {
            lines.push("directories:".to_string());
            lines.extend(self.directories.iter().map(|e| format!("  {}/", e.name)));
        }
        if !self.files.is_empty() {
            lines.push("files:".to_string());
            lines.extend(self.files.iter().map(|e| format!("  {}", e.name)));
        }
        if self.directories.is_empty() && self.files.is_empty() {
            lines.push("  (empty)".to_string());
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCounts {
    pub files: usize,
    pub directories: usize,
}

/// Successful result of one file operation. Paths are workspace-relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written {
        path: String,
        bytes: usize,
        replaced: bool,
    },
    Content {
        path: String,
        content: String,
    },
    Deleted {
        path: String,
    },
    DirectoryCreated {
        path: String,
        existed: bool,
    },
    DirectoryDeleted {
        path: String,
    },
    Renamed {
        from: String,
        to: String,
        kind: EntryKind,
    },
    Moved {
        from: String,
        to: String,
        kind: EntryKind,
    },
    Listing(DirectoryListing),
    Counts {
        path: String,
        counts: EntryCounts,
    },
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Self::Written {
                path,
                bytes,
                replaced,
            } => {
                let verb = if *replaced { "updated" } else { "created" };
                format!("{verb} file {path} ({bytes} bytes)")
            }
            Self::Content { path, content } => {
                format!("read {} bytes from {path}", content.len())
            }
            Self::Deleted { path } => format!("deleted file {path}"),
            Self::DirectoryCreated { path, existed } => {
                if *existed {
                    format!("directory {path} already exists")
                } else {
                    format!("created directory {path}")
                }
            }
            Self::DirectoryDeleted { path } => format!("deleted directory {path}"),
            Self::Renamed { from, to, kind } => format!("renamed {kind} {from} to {to}"),
            Self::Moved { from, to, kind } => format!("moved {kind} {from} to {to}"),
            Self::Listing(listing) => listing.render(),
            Self::Counts { path, counts } => format!(
                "directory {path} contains {} files and {} directories",
                counts.files, counts.directories
            ),
        }
    }
}
