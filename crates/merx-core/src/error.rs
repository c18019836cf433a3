//! Error types for the MERX console core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the console core and its adapters.
///
/// Routine failures (a single partition being down, a scoped endpoint that
/// does not exist) never reach this type; they are absorbed where they occur.
/// What remains are conditions the caller has to present to the user.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ConsoleError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport error (HTTP status or connection failure)
    #[error("Transport error ({}): {message}", status.map(|s| s.to_string()).unwrap_or_else(|| "no status".to_string()))]
    Transport { status: Option<u16>, message: String },

    /// A list payload matched none of the known response shapes
    #[error("Unrecognized response shape: expected an array or one of [{}]", expected.join(", "))]
    UnrecognizedShape { expected: Vec<String> },

    /// Every partition failed, or none were configured
    #[error("No data available: {} partition(s) unreachable", failed.len())]
    NoDataAvailable { failed: Vec<String> },

    /// An authenticated operation was attempted without a live session
    #[error("Session expired or not authenticated")]
    SessionExpired,

    /// Login succeeded upstream but the account is outside the allowed domains
    #[error("Email '{email}' is not in an allowed domain")]
    DomainRestricted { email: String },

    /// Credential or token exchange rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

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

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error means "no source could be reached"
    pub fn is_no_data_available(&self) -> bool {
        matches!(self, Self::NoDataAvailable { .. })
    }

    /// Check if the caller must re-authenticate before retrying
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if the upstream reported the resource as missing.
    ///
    /// Returns true for `NotFound` and for transport errors carrying a 404,
    /// which is how an absent scoped endpoint usually shows up.
    pub fn is_not_found_or_missing(&self) -> bool {
        self.is_not_found() || matches!(self, Self::Transport { status: Some(404), .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConsoleError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ConsoleError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for ConsoleError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, ConsoleError>`.
pub type Result<T> = std::result::Result<T, ConsoleError>;
