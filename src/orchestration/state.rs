use crate::file_ops::outcome::DirectoryListing;
use crate::orchestration::command::CommandInput;
use crate::search::SearchResult;
use crate::shared::errors::ErrorKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStatus {
    Success,
    Error,
}

impl OutputStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for OutputStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result payload of a run. Only the fields relevant to the executed command
/// are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OutputStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing: Option<DirectoryListing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

/// The single record threaded through every node of a run.
///
/// Invariants held by the nodes: `messages` only grows, and `error` is set
/// exactly when `output.status` is `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    #[serde(default)]
    pub input: CommandInput,
    #[serde(default)]
    pub output: WorkflowOutput,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default)]
    pub run_id: String,
}

impl WorkflowState {
    pub fn from_input(input: CommandInput) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    pub fn from_instruction(instruction: &str) -> Self {
        Self {
            instruction: Some(instruction.to_string()),
            ..Self::default()
        }
    }

    pub fn has_instruction(&self) -> bool {
        self.instruction
            .as_deref()
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }

    /// Marks the run successful. `output` carries the payload; the status,
    /// message and trace entry are filled here.
    pub fn record_success(&mut self, mut output: WorkflowOutput, message: String) {
        output.status = Some(OutputStatus::Success);
        output.error_kind = None;
        output.message = Some(message.clone());
        self.output = output;
        self.error = None;
        self.messages.push(message);
    }

    pub fn record_error(&mut self, kind: ErrorKind, message: String) {
        self.output = WorkflowOutput {
            status: Some(OutputStatus::Error),
            message: Some(message.clone()),
            error_kind: Some(kind),
            ..WorkflowOutput::default()
        };
        self.messages.push(format!("error: {message}"));
        self.error = Some(message);
    }

    pub fn is_success(&self) -> bool {
        self.output.status == Some(OutputStatus::Success)
    }

    pub fn is_error(&self) -> bool {
        self.output.status == Some(OutputStatus::Error)
    }
}
