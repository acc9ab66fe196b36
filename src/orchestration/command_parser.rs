use crate::orchestration::command::{Command, CommandInput, CommandKind, CommandType};
use crate::orchestration::workspace_access::{PathGuard, PolicyError};
use crate::provider::{InstructionTranslator, ProviderError};
use crate::shared::errors::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum CommandParseError {
    #[error("command is missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("unknown command `{command}`")]
    UnknownCommand { command: String },
    #[error("unknown command type `{command_type}`; expected file_ops or search")]
    UnknownType { command_type: String },
    #[error("command `{command}` cannot run with type `{command_type}`")]
    TypeMismatch {
        command: CommandKind,
        command_type: CommandType,
    },
    #[error("failed to parse instruction: {0}")]
    Translate(#[from] ProviderError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl CommandParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Policy(_) => ErrorKind::Policy,
            _ => ErrorKind::Parse,
        }
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Builds validated commands from raw fields, whether they came from a
/// caller or from an instruction translator.
#[derive(Debug, Clone, Copy)]
pub struct CommandParser<'a> {
    guard: &'a PathGuard,
}

impl<'a> CommandParser<'a> {
    pub fn new(guard: &'a PathGuard) -> Self {
        Self { guard }
    }

    /// Translates `instruction` and validates the candidate. Returns the
    /// canonical input alongside the command so callers can record it.
    pub fn from_instruction(
        &self,
        translator: &dyn InstructionTranslator,
        instruction: &str,
    ) -> Result<(CommandInput, Command), CommandParseError> {
        let candidate = translator.translate(instruction)?;
        let command = self.from_input(&candidate)?;
        Ok((command.to_input(), command))
    }

    /// Validation order: extension allow-list for create/update, then path
    /// containment, then the rename/move destination.
    pub fn from_input(&self, input: &CommandInput) -> Result<Command, CommandParseError> {
        let command_type = match present(input.command_type.as_ref()) {
            None => CommandType::FileOps,
            Some(raw) => CommandType::parse(raw).map_err(|_| CommandParseError::UnknownType {
                command_type: raw.to_string(),
            })?,
        };

        let kind = match present(input.command.as_ref()) {
            Some(raw) => {
                CommandKind::parse(raw).ok_or_else(|| CommandParseError::UnknownCommand {
                    command: raw.to_string(),
                })?
            }
            None if command_type == CommandType::Search => CommandKind::Search,
            None => return Err(CommandParseError::MissingField { field: "command" }),
        };
        let search_kind = kind == CommandKind::Search;
        if search_kind != (command_type == CommandType::Search) {
            return Err(CommandParseError::TypeMismatch {
                command: kind,
                command_type,
            });
        }

        let path = match present(input.path.as_ref()) {
            Some(path) => path,
            None if kind.defaults_to_root() => ".",
            None => return Err(CommandParseError::MissingField { field: "path" }),
        };
        if kind.writes_content() {
            self.guard.check_extension(path)?;
        }
        if kind.acts_on_entry() {
            self.guard.resolve_link(path)?;
        } else {
            self.guard.resolve(path)?;
        }

        let destination = if kind.needs_destination() {
            let destination = present(input.destination.as_ref())
                .ok_or(CommandParseError::MissingField {
                    field: "destination",
                })?;
            self.guard.resolve_link(destination)?;
            Some(destination.to_string())
        } else {
            None
        };

        let pattern = if search_kind {
            let pattern = input
                .pattern
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or(CommandParseError::MissingField { field: "pattern" })?;
            Some(pattern.to_string())
        } else {
            None
        };

        Ok(Command {
            command_type,
            kind,
            path: path.to_string(),
            content: kind
                .writes_content()
                .then(|| input.content.clone().unwrap_or_default()),
            pattern,
            destination,
            recursive: input.recursive.unwrap_or(true),
        })
    }
}
