use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {message}{}", reset_suffix(.reset))]
    RateLimit {
        message: String,
        reset: Option<DateTime<Utc>>,
    },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to delete {branch}: {reason}")]
    Deletion { branch: String, reason: String },

    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] anyhow::Error),
}

impl CleanupError {
    /// The message reported by the host, without the variant prefix.
    pub fn host_message(&self) -> String {
        match self {
            CleanupError::Auth(msg) | CleanupError::NotFound(msg) => msg.clone(),
            CleanupError::RateLimit { message, .. } => message.clone(),
            CleanupError::Api { message, .. } => message.clone(),
            CleanupError::Deletion { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

fn reset_suffix(reset: &Option<DateTime<Utc>>) -> String {
    match reset {
        Some(at) => format!(" (resets at {})", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, CleanupError>;
