//! Error types shared across Huddle crates.

use std::path::PathBuf;

/// Top-level error type for Huddle operations.
#[derive(Debug, thiserror::Error)]
pub enum HuddleError {
    #[error("Render error: {message}")]
    Render { message: String },

    #[error("No render target bound for stream {key}")]
    TargetNotFound { key: String },

    #[error("Native engine error: {message}")]
    Engine { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HuddleError.
pub type HuddleResult<T> = Result<T, HuddleError>;

impl HuddleError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn target_not_found(key: impl ToString) -> Self {
        Self::TargetNotFound {
            key: key.to_string(),
        }
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
