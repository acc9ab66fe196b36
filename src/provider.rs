pub mod openai;
pub mod output_parse;
pub mod prompt;
pub mod types;

pub use openai::OpenAiTranslator;
pub use output_parse::parse_command_reply;
pub use prompt::render_instruction_prompt;
pub use types::ProviderError;

use crate::orchestration::command::CommandInput;

/// Turns a natural-language instruction into candidate command fields.
///
/// Output is untrusted; the command parser validates it exactly like input
/// supplied directly by a caller.
pub trait InstructionTranslator: Send + Sync {
    fn translate(&self, instruction: &str) -> Result<CommandInput, ProviderError>;
}

impl<F> InstructionTranslator for F
where
    F: Fn(&str) -> Result<CommandInput, ProviderError> + Send + Sync,
{
    fn translate(&self, instruction: &str) -> Result<CommandInput, ProviderError> {
        self(instruction)
    }
}
