use crate::config::{load_settings, Settings};
use crate::orchestration::command::{CommandInput, CommandKind, CommandType};
use crate::orchestration::state::WorkflowState;
use crate::orchestration::workflow_engine::{run_workflow, WorkflowEngine};
use crate::provider::OpenAiTranslator;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Run,
    Search,
    Ask,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "run" => CliVerb::Run,
        "search" => CliVerb::Search,
        "ask" => CliVerb::Ask,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    let mut lines = vec![
        "Usage: file-agent [--config PATH] <command>".to_string(),
        String::new(),
        "Commands:".to_string(),
        "  run <operation> [--path P] [--content C] [--pattern G] [--destination D] [--no-recursive]"
            .to_string(),
        "                                       Run one operation inside the workspace".to_string(),
        "  search <path> <pattern>              Find files by name under a workspace directory"
            .to_string(),
        "  ask <instruction...>                 Translate an instruction and run it".to_string(),
        "  help                                 Show this help".to_string(),
        String::new(),
        "Operations:".to_string(),
    ];
    lines.extend(CommandKind::ALL.iter().map(|kind| format!("  {kind}")));
    lines
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}

/// Parsed command line: either help or one workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliRequest {
    Help,
    Workflow {
        config: Option<PathBuf>,
        state: WorkflowState,
    },
}

/// Printed result of one invocation. `success` drives the exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub text: String,
    pub success: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliRequest, String> {
    let mut config = None;
    let mut rest = args;
    while let Some(first) = rest.first() {
        if first != "--config" {
            break;
        }
        let value = rest
            .get(1)
            .ok_or_else(|| "`--config` requires a path".to_string())?;
        config = Some(PathBuf::from(value));
        rest = &rest[2..];
    }

    let Some(verb) = rest.first() else {
        return Ok(CliRequest::Help);
    };
    let state = match parse_cli_verb(verb) {
        CliVerb::Help => return Ok(CliRequest::Help),
        CliVerb::Run => WorkflowState::from_input(parse_run_args(&rest[1..])?),
        CliVerb::Search => match &rest[1..] {
            [path, pattern] => WorkflowState::from_input(CommandInput::search(path, pattern)),
            _ => return Err("usage: file-agent search <path> <pattern>".to_string()),
        },
        CliVerb::Ask => {
            let instruction = rest[1..].join(" ");
            if instruction.trim().is_empty() {
                return Err("usage: file-agent ask <instruction...>".to_string());
            }
            WorkflowState::from_instruction(&instruction)
        }
        CliVerb::Unknown => return Err(format!("unknown command `{verb}`")),
    };
    Ok(CliRequest::Workflow { config, state })
}

fn parse_run_args(args: &[String]) -> Result<CommandInput, String> {
    let Some(operation) = args.first() else {
        return Err("usage: file-agent run <operation> [options]".to_string());
    };
    let mut input = CommandInput {
        command: Some(operation.clone()),
        ..CommandInput::default()
    };
    if CommandKind::parse(operation) == Some(CommandKind::Search) {
        input.command_type = Some(CommandType::Search.as_str().to_string());
    }

    let mut index = 1;
    while index < args.len() {
        let flag = args[index].as_str();
        if flag == "--no-recursive" {
            input.recursive = Some(false);
            index += 1;
            continue;
        }
        let value = args
            .get(index + 1)
            .cloned()
            .ok_or_else(|| format!("`{flag}` requires a value"))?;
        match flag {
            "--path" => input.path = Some(value),
            "--content" => input.content = Some(value),
            "--pattern" => input.pattern = Some(value),
            "--destination" => input.destination = Some(value),
            "--type" => input.command_type = Some(value),
            other => return Err(format!("unknown option `{other}`")),
        }
        index += 2;
    }
    Ok(input)
}

/// Builds the engine for one invocation. The workspace directory is created
/// when missing; a translator is attached only when a model is configured.
pub fn build_engine<F>(settings: &Settings, lookup_env: F) -> Result<WorkflowEngine, String>
where
    F: Fn(&str) -> Option<String>,
{
    fs::create_dir_all(&settings.workspace_root).map_err(|e| {
        format!(
            "failed to create workspace {}: {e}",
            settings.workspace_root.display()
        )
    })?;
    let engine = WorkflowEngine::from_settings(settings).map_err(|e| e.to_string())?;
    if settings.llm.model.is_none() {
        return Ok(engine);
    }
    let translator =
        OpenAiTranslator::from_config(&settings.llm, lookup_env).map_err(|e| e.to_string())?;
    Ok(engine.with_translator(translator))
}

pub fn run_cli(args: Vec<String>) -> Result<CliOutput, String> {
    let (config, state) = match parse_cli_args(&args)? {
        CliRequest::Help => {
            return Ok(CliOutput {
                text: help_text(),
                success: true,
            })
        }
        CliRequest::Workflow { config, state } => (config, state),
    };

    let settings = load_settings(config.as_deref()).map_err(|e| e.to_string())?;
    let engine = build_engine(&settings, |name| std::env::var(name).ok())?;
    let final_state = run_workflow(&engine, state);
    let text = serde_json::to_string_pretty(&final_state)
        .map_err(|e| format!("failed to encode result: {e}"))?;
    Ok(CliOutput {
        text,
        success: final_state.is_success(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn empty_args_show_help() {
        assert_eq!(parse_cli_args(&[]).expect("help"), CliRequest::Help);
        assert!(help_text().contains("delete_directory"));
    }

    #[test]
    fn run_flags_fill_command_input() {
        let request = parse_cli_args(&args(&[
            "--config",
            "agent.yaml",
            "run",
            "move",
            "--path",
            "a.txt",
            "--destination",
            "archive/a.txt",
        ]))
        .expect("parse");
        let CliRequest::Workflow { config, state } = request else {
            panic!("expected workflow request");
        };
        assert_eq!(config, Some(PathBuf::from("agent.yaml")));
        assert_eq!(state.input.command.as_deref(), Some("move"));
        assert_eq!(state.input.destination.as_deref(), Some("archive/a.txt"));
        assert_eq!(state.input.command_type, None);
    }

    #[test]
    fn run_search_sets_search_type() {
        let request =
            parse_cli_args(&args(&["run", "search", "--pattern", "*.md"])).expect("parse");
        let CliRequest::Workflow { state, .. } = request else {
            panic!("expected workflow request");
        };
        assert!(state.input.is_search());
    }

    #[test]
    fn ask_joins_instruction_words() {
        let request =
            parse_cli_args(&args(&["ask", "read", "notes.txt"])).expect("parse");
        let CliRequest::Workflow { state, .. } = request else {
            panic!("expected workflow request");
        };
        assert_eq!(state.instruction.as_deref(), Some("read notes.txt"));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(parse_cli_args(&args(&["run", "read", "--path"])).is_err());
        assert!(parse_cli_args(&args(&["run", "read", "--bogus", "x"])).is_err());
        assert!(parse_cli_args(&args(&["search", "only-path"])).is_err());
        assert!(parse_cli_args(&args(&["ask"])).is_err());
        assert_eq!(
            parse_cli_args(&args(&["frobnicate"])).expect_err("unknown"),
            "unknown command `frobnicate`"
        );
    }
}
