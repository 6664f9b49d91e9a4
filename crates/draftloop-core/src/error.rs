//! Error types for the Draftloop workflow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when a failure carries no usable text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// A shared error type for the entire Draftloop workspace.
///
/// Remote failures carry the human-readable message already extracted from
/// the service's error payload, so they can be surfaced verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftloopError {
    /// The generation service answered with a non-success status.
    #[error("Remote error: {message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },

    /// The request could not be delivered or its response could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DraftloopError {
    /// Creates a Remote error
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the text a user should see for this failure.
    ///
    /// Remote failures yield the extracted service message without any
    /// decoration; everything else yields its display form. An empty message
    /// falls back to [`UNKNOWN_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Remote { message, .. } => message.clone(),
            Self::Transport(message) => message.clone(),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DraftloopError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for DraftloopError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DraftloopError>`.
pub type Result<T> = std::result::Result<T, DraftloopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_user_message_is_verbatim() {
        let err = DraftloopError::remote(Some(500), "Lead 2094 not found");
        assert_eq!(err.user_message(), "Lead 2094 not found");
        assert_eq!(err.to_string(), "Remote error: Lead 2094 not found");
    }

    #[test]
    fn test_empty_message_falls_back_to_unknown() {
        let err = DraftloopError::remote(None, "  ");
        assert_eq!(err.user_message(), UNKNOWN_ERROR_MESSAGE);

        let err = DraftloopError::transport("");
        assert_eq!(err.user_message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DraftloopError = io.into();
        assert!(matches!(err, DraftloopError::Io { .. }));
        assert!(err.user_message().contains("missing"));
    }
}
