use crate::orchestration::command::CommandInput;
use crate::provider::ProviderError;

/// Pulls the JSON command object out of a model reply. Replies may wrap the
/// object in a fenced block or surround it with prose.
pub fn parse_command_reply(reply: &str) -> Result<CommandInput, ProviderError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::ParseFailure {
            reason: "reply was empty".to_string(),
        });
    }

    let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) else {
        return Err(ProviderError::ParseFailure {
            reason: "reply does not contain a json object".to_string(),
        });
    };
    if end < start {
        return Err(ProviderError::ParseFailure {
            reason: "reply does not contain a json object".to_string(),
        });
    }

    serde_json::from_str::<CommandInput>(&trimmed[start..=end]).map_err(|err| {
        ProviderError::ParseFailure {
            reason: format!("invalid command json: {err}"),
        }
    })
}
