use super::{parse_command_reply, render_instruction_prompt, InstructionTranslator, ProviderError};
use crate::config::LlmConfig;
use crate::orchestration::command::CommandInput;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Translator backed by an OpenAI-compatible `chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiTranslator {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config<F>(config: &LlmConfig, lookup_env: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = config
            .model
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ProviderError::MissingModel)?;
        let api_key = lookup_env(&config.api_key_env)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                env: config.api_key_env.clone(),
            })?;
        Ok(Self::new(&config.api_base, api_key.trim(), model)
            .with_temperature(config.temperature)
            .with_timeout(Duration::from_secs(config.timeout_seconds)))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = agent
            .post(&self.endpoint())
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(body)
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => ProviderError::Status {
                    status,
                    body: response.into_string().unwrap_or_default(),
                },
                other => ProviderError::Request(other.to_string()),
            })?;

        let completion: ChatCompletion = response
            .into_json()
            .map_err(|err| ProviderError::ParseFailure {
                reason: format!("invalid completion body: {err}"),
            })?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::ParseFailure {
                reason: "completion has no message content".to_string(),
            })
    }
}

impl InstructionTranslator for OpenAiTranslator {
    fn translate(&self, instruction: &str) -> Result<CommandInput, ProviderError> {
        let reply = self.complete(&render_instruction_prompt(instruction))?;
        parse_command_reply(&reply)
    }
}
