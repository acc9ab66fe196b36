use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    FileOps,
    Search,
}

impl CommandType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileOps => "file_ops",
            Self::Search => "search",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file_ops" | "file-ops" | "fileops" => Ok(Self::FileOps),
            "search" => Ok(Self::Search),
            _ => Err("type must be one of: file_ops, search".to_string()),
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Create,
    Read,
    Update,
    Delete,
    Search,
    CreateDirectory,
    DeleteDirectory,
    Rename,
    Move,
    List,
    Count,
}

impl CommandKind {
    pub const ALL: [CommandKind; 11] = [
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Delete,
        Self::Search,
        Self::CreateDirectory,
        Self::DeleteDirectory,
        Self::Rename,
        Self::Move,
        Self::List,
        Self::Count,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Search => "search",
            Self::CreateDirectory => "create_directory",
            Self::DeleteDirectory => "delete_directory",
            Self::Rename => "rename",
            Self::Move => "move",
            Self::List => "list",
            Self::Count => "count",
        }
    }

    /// Accepts the canonical names plus the tool-style aliases language
    /// models tend to emit (`create_file`, `move_item`, `list_directory`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "create" | "create_file" | "write" => Self::Create,
            "read" | "read_file" => Self::Read,
            "update" | "update_file" => Self::Update,
            "delete" | "delete_file" | "remove" => Self::Delete,
            "search" | "find" => Self::Search,
            "create_directory" | "mkdir" => Self::CreateDirectory,
            "delete_directory" | "rmdir" => Self::DeleteDirectory,
            "rename" | "rename_file" => Self::Rename,
            "move" | "move_item" | "move_file" => Self::Move,
            "list" | "list_directory" | "ls" => Self::List,
            "count" | "count_files" => Self::Count,
            _ => return None,
        };
        Some(kind)
    }

    /// Create and update write file contents and are held to the extension
    /// allow-list.
    pub fn writes_content(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }

    pub fn needs_destination(self) -> bool {
        matches!(self, Self::Rename | Self::Move)
    }

    /// Commands that remove or relocate the entry at `path`. A symlink there
    /// is acted on as the link, not its target.
    pub fn acts_on_entry(self) -> bool {
        matches!(
            self,
            Self::Delete | Self::DeleteDirectory | Self::Rename | Self::Move
        )
    }

    /// Directory-scoped commands fall back to the workspace root when no
    /// path is given.
    pub fn defaults_to_root(self) -> bool {
        matches!(self, Self::List | Self::Count | Self::Search)
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw, unvalidated command fields as supplied by a caller or produced by an
/// instruction translator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInput {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

impl CommandInput {
    pub fn new(command: &str, path: &str) -> Self {
        Self {
            command: Some(command.to_string()),
            path: Some(path.to_string()),
            ..Self::default()
        }
    }

    pub fn search(path: &str, pattern: &str) -> Self {
        Self {
            command_type: Some(CommandType::Search.as_str().to_string()),
            path: Some(path.to_string()),
            pattern: Some(pattern.to_string()),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn with_destination(mut self, destination: &str) -> Self {
        self.destination = Some(destination.to_string());
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    pub fn is_search(&self) -> bool {
        self.command_type
            .as_deref()
            .map(|raw| CommandType::parse(raw) == Ok(CommandType::Search))
            .unwrap_or(false)
    }
}

/// A validated command. Built by the command parser and consumed once by a
/// workflow node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub command_type: CommandType,
    pub kind: CommandKind,
    pub path: String,
    pub content: Option<String>,
    pub pattern: Option<String>,
    pub destination: Option<String>,
    pub recursive: bool,
}

impl Command {
    pub fn new(kind: CommandKind, path: &str) -> Self {
        Self {
            command_type: if kind == CommandKind::Search {
                CommandType::Search
            } else {
                CommandType::FileOps
            },
            kind,
            path: path.to_string(),
            content: None,
            pattern: None,
            destination: None,
            recursive: true,
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_destination(mut self, destination: &str) -> Self {
        self.destination = Some(destination.to_string());
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Canonical field form, written back into the workflow state after an
    /// instruction has been parsed so routing sees normalized values.
    pub fn to_input(&self) -> CommandInput {
        CommandInput {
            command_type: Some(self.command_type.as_str().to_string()),
            command: Some(self.kind.as_str().to_string()),
            path: Some(self.path.clone()),
            content: self.content.clone(),
            pattern: self.pattern.clone(),
            destination: self.destination.clone(),
            recursive: (self.kind == CommandKind::DeleteDirectory).then_some(self.recursive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_parses_from_its_canonical_name() {
        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn tool_style_aliases_are_accepted() {
        assert_eq!(CommandKind::parse("create_file"), Some(CommandKind::Create));
        assert_eq!(CommandKind::parse("Move-Item"), Some(CommandKind::Move));
        assert_eq!(CommandKind::parse("list_directory"), Some(CommandKind::List));
        assert_eq!(CommandKind::parse("summarize"), None);
    }

    #[test]
    fn input_serializes_type_field_and_skips_absent_values() {
        let input = CommandInput::search("src", "*.py");
        let value = serde_json::to_value(&input).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"type": "search", "path": "src", "pattern": "*.py"})
        );
        assert!(input.is_search());
        assert!(!CommandInput::new("read", "a.txt").is_search());
    }

    #[test]
    fn canonical_input_keeps_recursive_only_for_directory_delete() {
        let delete = Command::new(CommandKind::DeleteDirectory, "old").with_recursive(false);
        assert_eq!(delete.to_input().recursive, Some(false));

        let create = Command::new(CommandKind::Create, "a.txt").with_content("x");
        let input = create.to_input();
        assert_eq!(input.recursive, None);
        assert_eq!(input.command_type.as_deref(), Some("file_ops"));
        assert_eq!(input.content.as_deref(), Some("x"));
    }
}
