use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("No API key configured. Set your API key first.")]
    MissingApiKey,

    #[error("Model API authentication failed: {0}")]
    Auth(String),

    #[error("Model API rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Model API request timed out")]
    Timeout,

    #[error("Could not reach the model API: {0}")]
    Transport(String),

    #[error("Model API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned an empty reply")]
    EmptyReply,
}

pub type ModelResult<T> = Result<T, ModelError>;
