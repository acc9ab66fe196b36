use crate::file_ops::{FileOperations, Outcome};
use crate::orchestration::command::Command;
use crate::orchestration::command_parser::CommandParser;
use crate::orchestration::error::WorkflowError;
use crate::orchestration::state::{WorkflowOutput, WorkflowState};
use crate::orchestration::transitions::NodeId;
use crate::provider::InstructionTranslator;
use crate::search::SearchEngine;
use crate::shared::errors::ErrorKind;
use crate::shared::ids::generate_run_id;

/// Borrowed collaborators for one run. Built per run from the engine so the
/// nodes never hold state between runs.
pub struct NodeContext<'a> {
    pub file_ops: &'a FileOperations,
    pub search: &'a SearchEngine,
    pub translator: Option<&'a dyn InstructionTranslator>,
}

impl NodeContext<'_> {
    fn parser(&self) -> CommandParser<'_> {
        CommandParser::new(self.file_ops.guard())
    }
}

pub fn run_node(node: NodeId, state: WorkflowState, ctx: &NodeContext<'_>) -> WorkflowState {
    match node {
        NodeId::Init => init(state),
        NodeId::Parse => parse(state, ctx),
        NodeId::FileOps => file_ops(state, ctx),
        NodeId::Search => search(state, ctx),
        NodeId::Terminal => terminal(state),
    }
}

fn init(mut state: WorkflowState) -> WorkflowState {
    if state.run_id.trim().is_empty() {
        state.run_id = generate_run_id();
    }
    if !state.has_instruction() {
        state.instruction = None;
    }
    // Caller-supplied messages are kept; the run trace is appended after them.
    state.output = WorkflowOutput::default();
    state.error = None;
    let source = if state.instruction.is_some() {
        "instruction"
    } else {
        "direct input"
    };
    state
        .messages
        .push(format!("run {} started from {source}", state.run_id));
    state
}

fn parse(mut state: WorkflowState, ctx: &NodeContext<'_>) -> WorkflowState {
    let Some(translator) = ctx.translator else {
        let err = WorkflowError::MissingTranslator;
        state.record_error(err.kind(), err.to_string());
        return state;
    };
    let instruction = state.instruction.clone().unwrap_or_default();
    match ctx.parser().from_instruction(translator, &instruction) {
        Ok((input, command)) => {
            state.input = input;
            state.messages.push(format!(
                "parsed instruction as `{}` on `{}`",
                command.kind, command.path
            ));
        }
        Err(err) => state.record_error(err.kind(), err.to_string()),
    }
    state
}

fn validated(state: &mut WorkflowState, ctx: &NodeContext<'_>) -> Option<Command> {
    match ctx.parser().from_input(&state.input) {
        Ok(command) => Some(command),
        Err(err) => {
            state.record_error(err.kind(), err.to_string());
            None
        }
    }
}

fn file_ops(mut state: WorkflowState, ctx: &NodeContext<'_>) -> WorkflowState {
    let Some(command) = validated(&mut state, ctx) else {
        return state;
    };
    match ctx.file_ops.execute(&command) {
        Ok(outcome) => {
            let message = outcome.message();
            state.record_success(outcome_output(outcome), message);
        }
        Err(err) => state.record_error(err.kind(), err.to_string()),
    }
    state
}

fn outcome_output(outcome: Outcome) -> WorkflowOutput {
    match outcome {
        Outcome::Content { content, .. } => WorkflowOutput {
            content: Some(content),
            ..WorkflowOutput::default()
        },
        Outcome::Listing(listing) => WorkflowOutput {
            listing: Some(listing),
            ..WorkflowOutput::default()
        },
        Outcome::Counts { counts, .. } => WorkflowOutput {
            file_count: Some(counts.files as u64),
            directory_count: Some(counts.directories as u64),
            ..WorkflowOutput::default()
        },
        _ => WorkflowOutput::default(),
    }
}

fn search(mut state: WorkflowState, ctx: &NodeContext<'_>) -> WorkflowState {
    let Some(command) = validated(&mut state, ctx) else {
        return state;
    };
    let pattern = command.pattern.as_deref().unwrap_or_default();
    match ctx.search.search(&command.path, pattern) {
        Ok(results) => {
            let message = format!(
                "found {} file(s) matching `{pattern}` under {}",
                results.len(),
                command.path
            );
            let output = WorkflowOutput {
                results: Some(results),
                ..WorkflowOutput::default()
            };
            state.record_success(output, message);
        }
        Err(err) => state.record_error(err.kind(), err.to_string()),
    }
    state
}

fn terminal(mut state: WorkflowState) -> WorkflowState {
    if state.output.status.is_none() {
        let err = WorkflowError::MissingStatus;
        state.record_error(ErrorKind::Workflow, err.to_string());
    }
    let status = state
        .output
        .status
        .map(|status| status.as_str())
        .unwrap_or("error");
    state
        .messages
        .push(format!("run {} finished with status {status}", state.run_id));
    state
}
