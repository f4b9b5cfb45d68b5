use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClawdError {
    #[error("Model gateway error: {0}")]
    Gateway(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Voice error: {0}")]
    Voice(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClawdError>;
