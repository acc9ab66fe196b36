pub mod error;
pub mod outcome;

pub use error::FileOpError;
pub use outcome::{DirectoryListing, EntryCounts, EntryKind, ListingEntry, Outcome};

use crate::orchestration::command::{Command, CommandKind};
use crate::orchestration::workspace_access::{ExtensionRule, PathGuard};
use crate::shared::fs_atomic::replace_file_contents;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn io_error(operation: &'static str, path: &str, source: std::io::Error) -> FileOpError {
    FileOpError::Io {
        operation,
        path: path.to_string(),
        source,
    }
}

/// Kind of whatever sits at `path`, following symlinks; `None` when nothing
/// is there.
fn entry_kind(path: &Path) -> Option<EntryKind> {
    let meta = fs::metadata(path).ok()?;
    Some(if meta.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    })
}

/// Kind of the entry at `path` itself. A symlink counts as a file whatever it
/// points to, dangling or not.
fn link_kind(path: &Path) -> Option<EntryKind> {
    let meta = fs::symlink_metadata(path).ok()?;
    Some(if meta.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    })
}

/// Creates `dir` with its missing ancestors and returns the ones it made,
/// deepest first.
fn create_missing_dirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut missing = Vec::new();
    let mut cursor = Some(dir);
    while let Some(current) = cursor {
        if fs::symlink_metadata(current).is_ok() {
            break;
        }
        missing.push(current.to_path_buf());
        cursor = current.parent();
    }
    if let Err(err) = fs::create_dir_all(dir) {
        remove_created_dirs(&missing);
        return Err(err);
    }
    Ok(missing)
}

fn remove_created_dirs(created: &[PathBuf]) {
    for dir in created {
        let _ = fs::remove_dir(dir);
    }
}

/// Primitive filesystem operations confined to one workspace.
#[derive(Debug, Clone)]
pub struct FileOperations {
    guard: PathGuard,
    max_file_size: u64,
}

impl FileOperations {
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    pub fn execute(&self, command: &Command) -> Result<Outcome, FileOpError> {
        let path = command.path.as_str();
        let content = command.content.as_deref().unwrap_or_default();
        match command.kind {
            CommandKind::Create => self.create(path, content),
            CommandKind::Update => self.update(path, content),
            CommandKind::Read => self.read(path),
            CommandKind::Delete => self.delete(path),
            CommandKind::CreateDirectory => self.create_directory(path),
            CommandKind::DeleteDirectory => self.delete_directory(path, command.recursive),
            CommandKind::Rename => self.rename(path, required_destination(command)?),
            CommandKind::Move => self.move_entry(path, required_destination(command)?),
            CommandKind::List => self.list(path).map(Outcome::Listing),
            CommandKind::Count => self.count(path),
            CommandKind::Search => Err(FileOpError::Unsupported {
                operation: command.kind.as_str().to_string(),
            }),
        }
    }

    pub fn create(&self, path: &str, content: &str) -> Result<Outcome, FileOpError> {
        self.write(path, content, "create")
    }

    /// Identical to [`FileOperations::create`]: a full overwrite that also
    /// creates the file when it is missing.
    pub fn update(&self, path: &str, content: &str) -> Result<Outcome, FileOpError> {
        self.write(path, content, "update")
    }

    fn write(
        &self,
        path: &str,
        content: &str,
        operation: &'static str,
    ) -> Result<Outcome, FileOpError> {
        let target = self.guard.validate(path, ExtensionRule::Enforce)?;
        let shown = self.guard.display_path(&target);
        let size = content.len() as u64;
        if size > self.max_file_size {
            return Err(FileOpError::TooLarge {
                path: shown,
                size,
                limit: self.max_file_size,
            });
        }
        let replaced = match entry_kind(&target) {
            Some(EntryKind::Directory) => {
                return Err(FileOpError::IsDirectory {
                    path: shown,
                    hint: "",
                })
            }
            Some(EntryKind::File) => true,
            None => false,
        };
        replace_file_contents(&target, content.as_bytes())
            .map_err(|source| io_error(operation, &shown, source))?;
        Ok(Outcome::Written {
            path: shown,
            bytes: content.len(),
            replaced,
        })
    }

    pub fn read(&self, path: &str) -> Result<Outcome, FileOpError> {
        let target = self.guard.resolve(path)?;
        let shown = self.guard.display_path(&target);
        let meta = match fs::metadata(&target) {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileOpError::NotFound { path: shown })
            }
            Err(source) => return Err(io_error("read", &shown, source)),
        };
        if meta.is_dir() {
            return Err(FileOpError::IsDirectory {
                path: shown,
                hint: "",
            });
        }
        if meta.len() > self.max_file_size {
            return Err(FileOpError::TooLarge {
                path: shown,
                size: meta.len(),
                limit: self.max_file_size,
            });
        }
        let content =
            fs::read_to_string(&target).map_err(|source| io_error("read", &shown, source))?;
        Ok(Outcome::Content {
            path: shown,
            content,
        })
    }

    pub fn delete(&self, path: &str) -> Result<Outcome, FileOpError> {
        let target = self.guard.resolve_entry(path, "delete")?;
        let shown = self.guard.display_path(&target);
        match link_kind(&target) {
            None => return Err(FileOpError::NotFound { path: shown }),
            Some(EntryKind::Directory) => {
                return Err(FileOpError::IsDirectory {
                    path: shown,
                    hint: "; use delete_directory instead",
                })
            }
            Some(EntryKind::File) => {}
        }
        fs::remove_file(&target).map_err(|source| io_error("delete", &shown, source))?;
        Ok(Outcome::Deleted { path: shown })
    }

    pub fn create_directory(&self, path: &str) -> Result<Outcome, FileOpError> {
        let target = self.guard.resolve(path)?;
        let shown = self.guard.display_path(&target);
        let existed = match entry_kind(&target) {
            Some(EntryKind::File) => return Err(FileOpError::NotADirectory { path: shown }),
            Some(EntryKind::Directory) => true,
            None => false,
        };
        fs::create_dir_all(&target)
            .map_err(|source| io_error("create directory", &shown, source))?;
        Ok(Outcome::DirectoryCreated {
            path: shown,
            existed,
        })
    }

    /// A symlink to a directory is not a directory here; remove the link
    /// with `delete`.
    pub fn delete_directory(&self, path: &str, recursive: bool) -> Result<Outcome, FileOpError> {
        let target = self.guard.resolve_entry(path, "delete_directory")?;
        let shown = self.guard.display_path(&target);
        match link_kind(&target) {
            None => return Err(FileOpError::NotFound { path: shown }),
            Some(EntryKind::File) => return Err(FileOpError::NotADirectory { path: shown }),
            Some(EntryKind::Directory) => {}
        }
        let removed = if recursive {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_dir(&target)
        };
        removed.map_err(|source| io_error("delete directory", &shown, source))?;
        Ok(Outcome::DirectoryDeleted { path: shown })
    }

    pub fn rename(&self, from: &str, to: &str) -> Result<Outcome, FileOpError> {
        let (source, destination, kind) = self.relocation_endpoints(from, to, "rename")?;
        let from_shown = self.guard.display_path(&source);
        let to_shown = self.guard.display_path(&destination);
        fs::rename(&source, &destination)
            .map_err(|err| io_error("rename", &from_shown, err))?;
        Ok(Outcome::Renamed {
            from: from_shown,
            to: to_shown,
            kind,
        })
    }

    /// Like rename, but creates the destination's parent directories once the
    /// preconditions hold. Parents it created are removed again if the move
    /// itself fails.
    pub fn move_entry(&self, from: &str, to: &str) -> Result<Outcome, FileOpError> {
        let (source, destination, kind) = self.relocation_endpoints(from, to, "move")?;
        let from_shown = self.guard.display_path(&source);
        let to_shown = self.guard.display_path(&destination);
        let created = match destination.parent() {
            Some(parent) => {
                create_missing_dirs(parent).map_err(|err| io_error("move", &to_shown, err))?
            }
            None => Vec::new(),
        };
        if let Err(err) = fs::rename(&source, &destination) {
            remove_created_dirs(&created);
            return Err(io_error("move", &from_shown, err));
        }
        Ok(Outcome::Moved {
            from: from_shown,
            to: to_shown,
            kind,
        })
    }

    fn relocation_endpoints(
        &self,
        from: &str,
        to: &str,
        operation: &str,
    ) -> Result<(PathBuf, PathBuf, EntryKind), FileOpError> {
        let source = self.guard.resolve_entry(from, operation)?;
        let destination = self.guard.resolve_entry(to, operation)?;
        let Some(kind) = link_kind(&source) else {
            return Err(FileOpError::NotFound {
                path: self.guard.display_path(&source),
            });
        };
        if link_kind(&destination).is_some() {
            return Err(FileOpError::AlreadyExists {
                path: self.guard.display_path(&destination),
            });
        }
        if kind == EntryKind::Directory && destination.starts_with(&source) {
            return Err(FileOpError::IntoItself {
                from: self.guard.display_path(&source),
                to: self.guard.display_path(&destination),
            });
        }
        Ok((source, destination, kind))
    }

    pub fn list(&self, path: &str) -> Result<DirectoryListing, FileOpError> {
        let (shown, entries) = self.read_directory(path, "list")?;
        let mut directories = Vec::new();
        let mut files = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Directory => directories.push(entry),
                EntryKind::File => files.push(entry),
            }
        }
        directories.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(DirectoryListing {
            path: shown,
            directories,
            files,
        })
    }

    /// Immediate children only; nested entries are not counted.
    pub fn count(&self, path: &str) -> Result<Outcome, FileOpError> {
        let (shown, entries) = self.read_directory(path, "count")?;
        let directories = entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Directory)
            .count();
        Ok(Outcome::Counts {
            path: shown,
            counts: EntryCounts {
                files: entries.len() - directories,
                directories,
            },
        })
    }

    fn read_directory(
        &self,
        path: &str,
        operation: &'static str,
    ) -> Result<(String, Vec<ListingEntry>), FileOpError> {
        let target = self.guard.resolve(path)?;
        let shown = self.guard.display_path(&target);
        match entry_kind(&target) {
            None => return Err(FileOpError::NotFound { path: shown }),
            Some(EntryKind::File) => return Err(FileOpError::NotADirectory { path: shown }),
            Some(EntryKind::Directory) => {}
        }
        let reader = fs::read_dir(&target).map_err(|source| io_error(operation, &shown, source))?;
        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|source| io_error(operation, &shown, source))?;
            let kind = if entry.path().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(ListingEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok((shown, entries))
    }
}

fn required_destination(command: &Command) -> Result<&str, FileOpError> {
    command
        .destination
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| FileOpError::MissingArgument {
            operation: command.kind.as_str().to_string(),
            argument: "destination",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(root: &Path) -> FileOperations {
        FileOperations::new(PathGuard::new(root, &[".txt", ".md"]).expect("guard"))
    }

    #[test]
    fn create_then_read_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ops = ops(temp.path());

        let written = ops.create("notes/today.txt", "X").expect("create");
        assert_eq!(
            written,
            Outcome::Written {
                path: "notes/today.txt".to_string(),
                bytes: 1,
                replaced: false,
            }
        );
        match ops.read("notes/today.txt").expect("read") {
            Outcome::Content { content, .. } => assert_eq!(content, "X"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn create_twice_is_an_overwrite_not_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ops = ops(temp.path());

        ops.create("a.txt", "X").expect("first");
        let second = ops.create("a.txt", "X").expect("second");
        assert!(matches!(second, Outcome::Written { replaced: true, .. }));
        assert_eq!(fs::read_to_string(temp.path().join("a.txt")).expect("read"), "X");
    }

    #[test]
    fn oversized_content_is_rejected_before_writing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ops = ops(temp.path()).with_max_file_size(4);

        let err = ops.create("big.txt", "12345").expect_err("too large");
        assert!(matches!(err, FileOpError::TooLarge { size: 5, limit: 4, .. }));
        assert!(!temp.path().join("big.txt").exists());
    }

    #[test]
    fn read_of_directory_reports_is_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("docs")).expect("mkdir");
        let err = ops(temp.path()).read("docs").expect_err("directory");
        assert!(matches!(err, FileOpError::IsDirectory { .. }));
    }

    #[test]
    fn created_parents_can_be_taken_back() {
        let temp = tempfile::tempdir().expect("tempdir");
        let created = create_missing_dirs(&temp.path().join("a/b/c")).expect("mkdir");
        assert_eq!(
            created,
            vec![
                temp.path().join("a/b/c"),
                temp.path().join("a/b"),
                temp.path().join("a"),
            ]
        );
        remove_created_dirs(&created);
        assert!(!temp.path().join("a").exists());
        assert!(temp.path().exists());
    }

    #[test]
    fn search_kind_is_not_a_file_operation() {
        let temp = tempfile::tempdir().expect("tempdir");
        let command = Command::new(CommandKind::Search, ".").with_pattern("*.txt");
        let err = ops(temp.path()).execute(&command).expect_err("unsupported");
        assert!(matches!(err, FileOpError::Unsupported { .. }));
    }

    #[test]
    fn rename_without_destination_is_reported() {
        let temp = tempfile::tempdir().expect("tempdir");
        let command = Command::new(CommandKind::Rename, "a.txt");
        let err = ops(temp.path()).execute(&command).expect_err("missing");
        assert_eq!(err.to_string(), "`rename` requires `destination`");
    }
}
