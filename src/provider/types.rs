#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no language model configured; set `llm.model` or LLM_MODELEND")]
    MissingModel,
    #[error("api key environment variable `{env}` is not set")]
    MissingApiKey { env: String },
    #[error("translator request failed: {0}")]
    Request(String),
    #[error("translator returned http {status}: {body}")]
    Status { status: u16, body: String },
    #[error("translator output parse failure: {reason}")]
    ParseFailure { reason: String },
    #[error("instruction could not be translated: {0}")]
    Rejected(String),
}
