use thiserror::Error;

/// Errors produced by the relay and the credential updater.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("missing credentials: {0}")]
    Config(String),

    #[error("provider returned status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid request body: {0}")]
    Decode(#[from] serde_json::Error),
}
