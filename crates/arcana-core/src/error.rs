//! Error types for the Arcana client.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Arcana client.
///
/// Variants follow the three failure families a front end has to present:
/// network/backend failures, validation failures caught before any request,
/// and local storage failures.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ArcanaError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (key-value storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any remote call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failure, non-2xx response or malformed body
    #[error("Network error: {message}")]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// The backend answered but refused the operation
    #[error("Backend rejected the request: {0}")]
    Backend(String),

    /// Balance too low for the requested debit
    #[error("Insufficient balance: {required} required, {available} available")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    /// Chat input is blocked until the session is recharged
    #[error("Session time is used up, recharge to continue")]
    InputBlocked,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArcanaError {
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

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Network error
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: message.into(),
        }
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
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

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InsufficientFunds { .. })
    }

    /// Check if this error came from the remote side (transport or refusal)
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Backend(_))
    }

    /// Check if this is a storage-level error
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::DataAccess(_) | Self::Serialization { .. }
        )
    }

    /// Title and message pair for a blocking alert.
    pub fn user_message(&self) -> (&'static str, String) {
        match self {
            Self::Validation(message) => ("Invalid input", message.clone()),
            Self::InsufficientFunds { required, .. } => (
                "Not enough balance",
                format!("You need at least {required} RMB. Please recharge to continue."),
            ),
            Self::InputBlocked => (
                "Session ended",
                "Recharge to continue chatting.".to_string(),
            ),
            Self::Backend(message) => ("Error", message.clone()),
            Self::Network { message, .. } => ("Network error", message.clone()),
            Self::NotFound { entity_type, id } => {
                ("Not found", format!("No {entity_type} named '{id}'"))
            }
            other => ("Error", other.to_string()),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ArcanaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ArcanaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ArcanaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ArcanaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<minijinja::Error> for ArcanaError {
    fn from(err: minijinja::Error) -> Self {
        Self::Internal(format!("Template error: {err}"))
    }
}

/// Conversion from anyhow::Error (used at the binary boundary)
impl From<anyhow::Error> for ArcanaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ArcanaError>`.
pub type Result<T> = std::result::Result<T, ArcanaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(ArcanaError::not_found("session", "s_1").is_not_found());
        assert!(ArcanaError::validation("empty").is_validation());
        assert!(ArcanaError::network(Some(502), "bad gateway").is_remote());
        assert!(ArcanaError::backend("insufficient funds").is_remote());
        assert!(ArcanaError::io("disk full").is_storage());
        assert!(!ArcanaError::InputBlocked.is_remote());
    }

    #[test]
    fn test_user_message_for_insufficient_funds() {
        let err = ArcanaError::InsufficientFunds {
            required: Decimal::from(6),
            available: Decimal::from(2),
        };
        let (title, message) = err.user_message();
        assert_eq!(title, "Not enough balance");
        assert!(message.contains("6 RMB"));
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: ArcanaError = io.into();
        assert!(err.to_string().contains("PermissionDenied"));
    }
}
