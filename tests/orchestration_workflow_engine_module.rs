use file_agent::orchestration::{
    run_workflow, CommandInput, NodeId, OutputStatus, PathGuard, WorkflowEngine, WorkflowState,
};
use file_agent::provider::ProviderError;
use file_agent::shared::errors::ErrorKind;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn engine(root: &Path) -> WorkflowEngine {
    let guard = PathGuard::new(root, &[".txt", ".md", ".pdf", ".doc", ".docx"]).expect("guard");
    WorkflowEngine::new(guard)
}

fn fixed_translator(
    input: CommandInput,
) -> impl Fn(&str) -> Result<CommandInput, ProviderError> + Send + Sync {
    move |_| Ok(input.clone())
}

#[test]
fn create_then_read_round_trips_content() {
    let temp = tempfile::tempdir().expect("tempdir");
    let engine = engine(temp.path());

    let created = run_workflow(
        &engine,
        WorkflowState::from_input(CommandInput::new("create", "notes.txt").with_content("hello")),
    );
    assert_eq!(created.output.status, Some(OutputStatus::Success));
    assert_eq!(created.error, None);

    let read = run_workflow(
        &engine,
        WorkflowState::from_input(CommandInput::new("read", "notes.txt")),
    );
    assert_eq!(read.output.status, Some(OutputStatus::Success));
    assert_eq!(read.output.content.as_deref(), Some("hello"));
}

#[test]
fn reading_missing_file_reports_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let state = run_workflow(
        &engine(temp.path()),
        WorkflowState::from_input(CommandInput::new("read", "missing.txt")),
    );
    assert_eq!(state.output.status, Some(OutputStatus::Error));
    assert_eq!(state.output.error_kind, Some(ErrorKind::NotFound));
    assert!(state
        .error
        .as_deref()
        .expect("error text")
        .contains("does not exist"));
}

#[test]
fn create_delete_read_ends_in_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let engine = engine(temp.path());
    for input in [
        CommandInput::new("create", "gone.txt").with_content("x"),
        CommandInput::new("delete", "gone.txt"),
    ] {
        assert!(engine.run(WorkflowState::from_input(input)).is_success());
    }
    let state = engine.run(WorkflowState::from_input(CommandInput::new("read", "gone.txt")));
    assert_eq!(state.output.error_kind, Some(ErrorKind::NotFound));
}

#[test]
fn creating_twice_leaves_single_file_with_latest_content() {
    let temp = tempfile::tempdir().expect("tempdir");
    let engine = engine(temp.path());
    for content in ["first", "second"] {
        let state = engine.run(WorkflowState::from_input(
            CommandInput::new("create", "twice.txt").with_content(content),
        ));
        assert!(state.is_success());
    }
    assert_eq!(
        fs::read_to_string(temp.path().join("twice.txt")).expect("read"),
        "second"
    );
    assert_eq!(fs::read_dir(temp.path()).expect("dir").count(), 1);
}

#[test]
fn search_returns_only_matching_python_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join("src/sub")).expect("dirs");
    for file in ["src/a.py", "src/sub/b.py", "src/a.txt"] {
        fs::write(temp.path().join(file), "x").expect("write");
    }

    let run = engine(temp.path()).run_traced(WorkflowState::from_input(CommandInput::search(
        "src", "*.py",
    )));
    assert_eq!(
        run.path,
        vec![NodeId::Init, NodeId::Search, NodeId::Terminal]
    );
    let results = run.state.output.results.expect("results");
    let mut names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["a.py", "b.py"]);
}

#[test]
fn empty_search_is_success_with_no_results() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(temp.path().join("src")).expect("dir");
    let state = engine(temp.path()).run(WorkflowState::from_input(CommandInput::search(
        "src", "*.rs",
    )));
    assert!(state.is_success());
    assert_eq!(state.output.results, Some(Vec::new()));
}

#[test]
fn translated_traversal_is_rejected_before_any_write() {
    let temp = tempfile::tempdir().expect("tempdir");
    let workspace = temp.path().join("ws");
    fs::create_dir(&workspace).expect("ws");
    let engine = engine(&workspace).with_translator(fixed_translator(
        CommandInput::new("create", "../etc/passwd").with_content("owned"),
    ));

    let run = engine.run_traced(WorkflowState::from_instruction(
        "overwrite the password file",
    ));
    assert_eq!(
        run.path,
        vec![NodeId::Init, NodeId::Parse, NodeId::Terminal]
    );
    assert_eq!(run.state.output.error_kind, Some(ErrorKind::Policy));
    assert!(!temp.path().join("etc").exists());
    assert_eq!(fs::read_dir(&workspace).expect("dir").count(), 0);
}

#[test]
fn instruction_runs_visit_parse_before_work() {
    let temp = tempfile::tempdir().expect("tempdir");
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let engine = engine(temp.path()).with_translator(
        move |instruction: &str| -> Result<CommandInput, ProviderError> {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(instruction, "list the workspace");
            let mut input = CommandInput::new("list_directory", "");
            input.path = None;
            Ok(input)
        },
    );

    let run = engine.run_traced(WorkflowState::from_instruction("list the workspace"));
    assert_eq!(
        run.path,
        vec![
            NodeId::Init,
            NodeId::Parse,
            NodeId::FileOps,
            NodeId::Terminal
        ]
    );
    assert!(run.state.is_success());
    assert_eq!(run.state.input.command.as_deref(), Some("list"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn direct_runs_never_call_the_translator() {
    let temp = tempfile::tempdir().expect("tempdir");
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let engine = engine(temp.path()).with_translator(
        move |_: &str| -> Result<CommandInput, ProviderError> {
            seen.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Rejected("unused".to_string()))
        },
    );
    let run = engine.run_traced(WorkflowState::from_input(CommandInput::new("count", ".")));
    assert!(!run.path.contains(&NodeId::Parse));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn translator_failure_is_a_parse_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let engine = engine(temp.path()).with_translator(
        |_: &str| -> Result<CommandInput, ProviderError> {
            Err(ProviderError::ParseFailure {
                reason: "no json object".to_string(),
            })
        },
    );
    let state = engine.run(WorkflowState::from_instruction("do something vague"));
    assert_eq!(state.output.error_kind, Some(ErrorKind::Parse));
    assert!(state.error.as_deref().expect("error").contains("no json object"));
}

#[test]
fn missing_type_routes_to_file_operations() {
    let temp = tempfile::tempdir().expect("tempdir");
    let run = engine(temp.path()).run_traced(WorkflowState::from_input(
        CommandInput::new("create_directory", "docs"),
    ));
    assert_eq!(
        run.path,
        vec![NodeId::Init, NodeId::FileOps, NodeId::Terminal]
    );
    assert!(temp.path().join("docs").is_dir());
}

#[test]
fn messages_trace_every_node_in_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut initial = WorkflowState::from_input(CommandInput::new("read", "absent.txt"));
    initial.run_id = "run-trace".to_string();
    let state = engine(temp.path()).run(initial);
    assert_eq!(
        state.messages,
        vec![
            "run run-trace started from direct input".to_string(),
            "error: `absent.txt` does not exist".to_string(),
            "run run-trace finished with status error".to_string(),
        ]
    );
}

#[test]
fn caller_messages_survive_the_run() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut initial =
        WorkflowState::from_input(CommandInput::new("create", "a.txt").with_content("x"));
    initial.run_id = "run-kept".to_string();
    initial.messages.push("caller trace".to_string());

    let state = engine(temp.path()).run(initial);
    assert!(state.is_success());
    assert_eq!(
        state.messages,
        vec![
            "caller trace".to_string(),
            "run run-kept started from direct input".to_string(),
            "created file a.txt (1 bytes)".to_string(),
            "run run-kept finished with status success".to_string(),
        ]
    );
}

#[test]
fn concurrent_runs_share_one_engine() {
    let temp = tempfile::tempdir().expect("tempdir");
    let engine = Arc::new(engine(temp.path()));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                engine.run(WorkflowState::from_input(
                    CommandInput::new("create", &format!("file-{i}.txt"))
                        .with_content(&i.to_string()),
                ))
            })
        })
        .collect();

    for handle in handles {
        let state = handle.join().expect("thread");
        assert!(state.is_success());
        assert!(state.run_id.starts_with("run-"));
    }
    for i in 0..8 {
        assert_eq!(
            fs::read_to_string(temp.path().join(format!("file-{i}.txt"))).expect("read"),
            i.to_string()
        );
    }
}

#[test]
fn final_state_serializes_with_stable_shape() {
    let temp = tempfile::tempdir().expect("tempdir");
    let state = engine(temp.path()).run(WorkflowState::from_input(CommandInput::new(
        "create", "script.sh",
    )));
    let value = serde_json::to_value(&state).expect("json");
    assert_eq!(value["output"]["status"], "error");
    assert_eq!(value["output"]["error_kind"], "policy");
    assert!(value["error"].is_string());
    assert!(value["messages"].is_array());
}
