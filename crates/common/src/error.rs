//! Error types shared across touchslot crates.

use std::path::PathBuf;

/// Top-level error type for touchslot operations.
#[derive(Debug, thiserror::Error)]
pub enum TouchslotError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Device error: {message}")]
    Device { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TouchslotError.
pub type TouchslotResult<T> = Result<T, TouchslotError>;

impl TouchslotError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: msg.into(),
        }
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device {
            message: msg.into(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
