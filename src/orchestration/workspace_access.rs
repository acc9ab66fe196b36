use crate::config::{normalize_extension, Settings};
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("path must be non-empty")]
    EmptyPath,
    #[error("path `{path}` contains a `..` segment; access outside the workspace is not allowed")]
    PathTraversal { path: String },
    #[error("path `{path}` resolves outside the workspace root `{root}`")]
    OutsideWorkspace { path: String, root: String },
    #[error("file type `{extension}` is not allowed for `{path}`")]
    DisallowedExtension { path: String, extension: String },
    #[error("operation `{operation}` may not target the workspace root itself")]
    WorkspaceRoot { operation: String },
    #[error("workspace root `{root}` is invalid: {reason}")]
    InvalidRoot { root: String, reason: String },
}

/// Whether the allow-list applies. Only content-writing commands
/// (create/update) are restricted by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionRule {
    Enforce,
    Skip,
}

/// Confines every path an operation touches to one workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    root: PathBuf,
    allowed_extensions: Vec<String>,
}

impl PathGuard {
    pub fn new<S: AsRef<str>>(root: &Path, allowed_extensions: &[S]) -> Result<Self, PolicyError> {
        let root = canonicalize_root(root)?;
        let mut allowed_extensions: Vec<String> = allowed_extensions
            .iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        allowed_extensions.sort();
        allowed_extensions.dedup();
        Ok(Self {
            root,
            allowed_extensions,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, PolicyError> {
        Self::new(&settings.workspace_root, &settings.allowed_extensions())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Extension check first, containment second; the first failure wins.
    pub fn validate(&self, raw: &str, rule: ExtensionRule) -> Result<PathBuf, PolicyError> {
        if rule == ExtensionRule::Enforce {
            self.check_extension(raw)?;
        }
        self.resolve(raw)
    }

    pub fn check_extension(&self, raw: &str) -> Result<(), PolicyError> {
        let extension = Path::new(raw.trim())
            .extension()
            .and_then(|ext| ext.to_str())
            .map(normalize_extension)
            .unwrap_or_default();
        if !extension.is_empty() && self.allowed_extensions.contains(&extension) {
            return Ok(());
        }
        Err(PolicyError::DisallowedExtension {
            path: raw.to_string(),
            extension: if extension.is_empty() {
                "(none)".to_string()
            } else {
                extension
            },
        })
    }

    /// Resolves `raw` (relative to the root, or absolute) to an absolute path
    /// inside the root. Symlinks along the existing part of the path are
    /// followed before the containment check.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, PolicyError> {
        let resolved = canonicalize_existing_prefix(&self.joined(raw)?);
        self.contained(raw, resolved)
    }

    /// Like [`PathGuard::resolve`], except that the last component is never
    /// followed. A symlink resolves to the link itself, so removing or
    /// relocating it leaves the target alone.
    pub fn resolve_link(&self, raw: &str) -> Result<PathBuf, PolicyError> {
        let joined = self.joined(raw)?;
        let resolved = match (joined.parent(), joined.file_name()) {
            (Some(parent), Some(name)) => canonicalize_existing_prefix(parent).join(name),
            _ => joined,
        };
        self.contained(raw, resolved)
    }

    /// [`PathGuard::resolve_link`] for operations that would remove or
    /// relocate the entry; the root directory itself is refused.
    pub fn resolve_entry(&self, raw: &str, operation: &str) -> Result<PathBuf, PolicyError> {
        let resolved = self.resolve_link(raw)?;
        if resolved == self.root {
            return Err(PolicyError::WorkspaceRoot {
                operation: operation.to_string(),
            });
        }
        Ok(resolved)
    }

    fn joined(&self, raw: &str) -> Result<PathBuf, PolicyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PolicyError::EmptyPath);
        }
        let requested = Path::new(trimmed);
        if requested
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            return Err(PolicyError::PathTraversal {
                path: raw.to_string(),
            });
        }
        if requested.is_absolute() {
            normalize_absolute_path(requested)
        } else {
            normalize_absolute_path(&self.root.join(requested))
        }
    }

    fn contained(&self, raw: &str, resolved: PathBuf) -> Result<PathBuf, PolicyError> {
        if !resolved.starts_with(&self.root) {
            return Err(PolicyError::OutsideWorkspace {
                path: raw.to_string(),
                root: self.root.display().to_string(),
            });
        }
        Ok(resolved)
    }

    /// Root-relative rendering used in user-facing messages.
    pub fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
            Ok(relative) => relative.display().to_string(),
            Err(_) => path.display().to_string(),
        }
    }
}

/// Canonical form of the root. A root that does not exist yet is judged by
/// its deepest existing ancestor, the same way [`PathGuard::resolve`] judges
/// paths under it.
fn canonicalize_root(path: &Path) -> Result<PathBuf, PolicyError> {
    let normalized = normalize_absolute_path(path)?;
    match fs::canonicalize(&normalized) {
        Ok(canonical) => normalize_absolute_path(&canonical),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Ok(canonicalize_existing_prefix(&normalized))
        }
        Err(err) => Err(PolicyError::InvalidRoot {
            root: path.display().to_string(),
            reason: err.to_string(),
        }),
    }
}

/// Canonicalizes the deepest ancestor that exists and re-appends the rest, so
/// a not-yet-created file under a symlinked directory is judged by where the
/// directory really lives.
fn canonicalize_existing_prefix(path: &Path) -> PathBuf {
    let mut existing = path.to_path_buf();
    let mut missing = Vec::new();
    loop {
        if let Ok(mut canonical) = fs::canonicalize(&existing) {
            for name in missing.iter().rev() {
                canonical.push(name);
            }
            return canonical;
        }
        let Some(name) = existing.file_name().map(|name| name.to_os_string()) else {
            return path.to_path_buf();
        };
        missing.push(name);
        if !existing.pop() {
            return path.to_path_buf();
        }
    }
}

pub(crate) fn normalize_absolute_path(path: &Path) -> Result<PathBuf, PolicyError> {
    if !path.is_absolute() {
        return Err(PolicyError::InvalidRoot {
            root: path.display().to_string(),
            reason: "path must be absolute".to_string(),
        });
    }

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::Normal(v) => normalized.push(v),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(PolicyError::PathTraversal {
                        path: path.display().to_string(),
                    });
                }
            }
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
        }
    }
    Ok(normalized)
}
