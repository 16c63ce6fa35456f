//! Error types for Glance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every Glance crate.
///
/// Variants map onto the three failure classes a panel can observe:
/// configuration errors (terminal, nothing is sent), transport errors
/// (shown in the transcript, user may resubmit) and internal errors.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GlanceError {
    /// API key or project id is absent from the credential store
    #[error("Missing API key or Project ID. Please configure it.")]
    MissingCredentials,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-success HTTP status or network failure on a completion call
    #[error("{}", transport_message(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The completion endpoint answered without any content
    #[error("Completion returned no content")]
    EmptyReply,

    /// A submission is already in flight for this session
    #[error("A request is already in progress")]
    Busy,

    /// The overlay owning this session has been closed
    #[error("Session detached from its overlay (generation {generation})")]
    Detached { generation: u64 },

    /// Overlay load parameters are missing or malformed
    #[error("Invalid overlay parameters: {0}")]
    InvalidHandoff(String),

    /// Prompt template failed to render
    #[error("Template error: {0}")]
    Template(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Error {code}: {message}"),
        None => format!("Error: {message}"),
    }
}

impl GlanceError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Transport error
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Creates an InvalidHandoff error
    pub fn invalid_handoff(message: impl Into<String>) -> Self {
        Self::InvalidHandoff(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Configuration-class errors are terminal: no request is attempted
    /// and nothing is retried.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredentials | Self::Config(_))
    }

    /// Check if this error came from a completion call
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::EmptyReply)
    }

    /// Check if this is a Busy rejection
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Check if this is a Detached error
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::Detached { .. })
    }

    /// HTTP status code, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for GlanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for GlanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GlanceError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for GlanceError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<minijinja::Error> for GlanceError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

/// A type alias for `Result<T, GlanceError>`.
pub type Result<T> = std::result::Result<T, GlanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_includes_status() {
        let err = GlanceError::transport(Some(500), "Internal Server Error");
        assert_eq!(err.to_string(), "Error 500: Internal Server Error");
        assert_eq!(err.status(), Some(500));
        assert!(err.is_transport());
    }

    #[test]
    fn test_transport_display_without_status() {
        let err = GlanceError::transport(None, "connection refused");
        assert_eq!(err.to_string(), "Error: connection refused");
    }

    #[test]
    fn test_missing_credentials_is_configuration() {
        assert!(GlanceError::MissingCredentials.is_configuration());
        assert!(GlanceError::config("bad limits").is_configuration());
        assert!(!GlanceError::Busy.is_configuration());
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "secret.json");
        let err: GlanceError = io.into();
        match err {
            GlanceError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
