/// Core error types for the Shelet engine.
use std::path::PathBuf;

/// A specialized Result type for Shelet operations.
pub type SheletResult<T> = Result<T, SheletError>;

/// Top-level error type encompassing all Shelet subsystems.
#[derive(Debug, thiserror::Error)]
pub enum SheletError {
    #[error("asset error: {message} ({path:?})")]
    Asset { message: String, path: PathBuf },

    #[error("config error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("filter graph error: {0}")]
    Graph(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SheletError {
    /// Create an asset error.
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        SheletError::Asset {
            message: message.into(),
            path: path.into(),
        }
    }
}
