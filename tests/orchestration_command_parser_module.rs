use file_agent::orchestration::{
    CommandInput, CommandKind, CommandParseError, CommandParser, CommandType, PathGuard,
    PolicyError,
};
use file_agent::provider::ProviderError;

fn guard(root: &std::path::Path) -> PathGuard {
    PathGuard::new(root, &[".txt", ".md", ".pdf", ".doc", ".docx"]).expect("guard")
}

#[test]
fn instruction_translation_yields_canonical_input() {
    let temp = tempfile::tempdir().expect("tempdir");
    let guard = guard(temp.path());
    let translator = |_: &str| -> Result<CommandInput, ProviderError> {
        Ok(CommandInput {
            command_type: Some("FILE_OPS".to_string()),
            command: Some("rename_file".to_string()),
            path: Some(" draft.md ".to_string()),
            destination: Some("final.md".to_string()),
            ..CommandInput::default()
        })
    };

    let (input, command) = CommandParser::new(&guard)
        .from_instruction(&translator, "rename draft.md to final.md")
        .expect("parse");
    assert_eq!(command.kind, CommandKind::Rename);
    assert_eq!(command.command_type, CommandType::FileOps);
    assert_eq!(command.path, "draft.md");
    assert_eq!(input.command.as_deref(), Some("rename"));
    assert_eq!(input.command_type.as_deref(), Some("file_ops"));
    assert_eq!(input.destination.as_deref(), Some("final.md"));
}

#[test]
fn translator_errors_surface_as_translate_errors() {
    let temp = tempfile::tempdir().expect("tempdir");
    let guard = guard(temp.path());
    let translator = |_: &str| -> Result<CommandInput, ProviderError> {
        Err(ProviderError::Request("connection refused".to_string()))
    };
    let err = CommandParser::new(&guard)
        .from_instruction(&translator, "read a.txt")
        .expect_err("translate");
    assert!(matches!(err, CommandParseError::Translate(_)));
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn traversal_in_write_path_is_a_policy_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let guard = guard(temp.path());
    let err = CommandParser::new(&guard)
        .from_input(&CommandInput::new("update", "../outside.txt").with_content("x"))
        .expect_err("traversal");
    assert!(matches!(
        err,
        CommandParseError::Policy(PolicyError::PathTraversal { .. })
    ));
}

#[test]
fn directory_delete_keeps_recursive_flag() {
    let temp = tempfile::tempdir().expect("tempdir");
    let guard = guard(temp.path());
    let parser = CommandParser::new(&guard);

    let command = parser
        .from_input(&CommandInput::new("delete_directory", "old"))
        .expect("parse");
    assert!(command.recursive);

    let command = parser
        .from_input(&CommandInput::new("rmdir", "old").with_recursive(false))
        .expect("parse");
    assert_eq!(command.kind, CommandKind::DeleteDirectory);
    assert!(!command.recursive);
}

#[test]
fn search_pattern_is_kept_verbatim() {
    let temp = tempfile::tempdir().expect("tempdir");
    let guard = guard(temp.path());
    let command = CommandParser::new(&guard)
        .from_input(&CommandInput::search("docs", " *.md"))
        .expect("parse");
    assert_eq!(command.pattern.as_deref(), Some(" *.md"));
    assert_eq!(command.content, None);
}
