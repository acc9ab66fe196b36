use crate::orchestration::command::CommandKind;

const INSTRUCTION_TEMPLATE: &str = r#"You are a file operation assistant. Convert the user's instruction into one structured file command.

Available commands:
{commands}

Return a single JSON object and nothing else, using these fields:
  "type": "file_ops" or "search" (use "search" only for the search command)
  "command": one of the command names above
  "path": file or directory path relative to the workspace
  "content": file content for create/update, otherwise omit
  "pattern": file name pattern for search, `*` matches any characters, otherwise omit
  "destination": target path for rename/move, otherwise omit
  "recursive": for delete_directory only, whether to remove contents too

User instruction: {instruction}
"#;

fn command_description(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::Create => "create a new file",
        CommandKind::Read => "read a file's content",
        CommandKind::Update => "replace a file's content",
        CommandKind::Delete => "delete a file",
        CommandKind::Search => "search for files by name pattern",
        CommandKind::CreateDirectory => "create a directory",
        CommandKind::DeleteDirectory => "delete a directory",
        CommandKind::Rename => "rename a file or directory",
        CommandKind::Move => "move a file or directory",
        CommandKind::List => "list a directory",
        CommandKind::Count => "count files and directories in a directory",
    }
}

pub fn render_instruction_prompt(instruction: &str) -> String {
    let commands = CommandKind::ALL
        .iter()
        .map(|kind| format!("- {}: {}", kind.as_str(), command_description(*kind)))
        .collect::<Vec<_>>()
        .join("\n");
    INSTRUCTION_TEMPLATE
        .replace("{commands}", &commands)
        .replace("{instruction}", instruction.trim())
}
