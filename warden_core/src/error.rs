use redis::RedisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),
    #[error("Store operation timed out after {0}s")]
    Timeout(u64),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Inference endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode inference response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SetRulesError {
    #[error("Rules must be at least {min} characters long (got {len})")]
    TooShort { len: usize, min: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}
