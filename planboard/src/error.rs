//! Error types for the planboard core

use serde::Serialize;
use thiserror::Error;

/// Result type for planboard operations
pub type Result<T> = std::result::Result<T, PlanError>;

/// Coarse classification of a [`PlanError`].
///
/// An outer transport layer maps these to its own status codes
/// (404, 400, 409, 500).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidIdentifier,
    Validation,
    Conflict,
    StoreFailure,
}

/// Errors that can occur in planboard operations
#[derive(Debug, Error)]
pub enum PlanError {
    /// A record of the given kind does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Id is not a well-formed identifier
    #[error("invalid identifier: {id:?}")]
    InvalidIdentifier { id: String },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Duplicate ID
    #[error("duplicate {entity} ID: {id}")]
    DuplicateId { entity: String, id: String },

    /// Another user already holds this email
    #[error("email already registered: {email}")]
    DuplicateEmail { email: String },

    /// Invalid operation
    #[error("invalid operation: {verb} {noun}")]
    InvalidOperation { verb: String, noun: String },

    /// Parse error
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Lock is held by another process
    #[error("lock busy - another process holds the data directory")]
    LockBusy,

    /// Backend failure not covered by Io/Json (including injected faults)
    #[error("store failure: {message}")]
    Store { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanError {
    /// Create a not-found error
    pub fn not_found(entity: impl std::fmt::Display, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        Self::InvalidIdentifier { id: id.into() }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate ID error
    pub fn duplicate_id(entity: impl std::fmt::Display, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            entity: entity.to_string(),
            id: id.into(),
        }
    }

    /// Create a store failure
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::MissingField { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidOperation { .. }
            | Self::Parse { .. } => ErrorKind::Validation,
            Self::DuplicateId { .. } | Self::DuplicateEmail { .. } => ErrorKind::Conflict,
            Self::LockBusy | Self::Store { .. } | Self::Io(_) | Self::Json(_) => {
                ErrorKind::StoreFailure
            }
        }
    }

    /// True for the not-found kind
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanError::not_found("card", "01ABC");
        assert_eq!(err.to_string(), "card not found: 01ABC");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            PlanError::invalid_identifier("nope").kind(),
            ErrorKind::InvalidIdentifier
        );
        assert_eq!(
            PlanError::missing_field("title").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            PlanError::DuplicateEmail {
                email: "a@b.c".into()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(PlanError::store("boom").kind(), ErrorKind::StoreFailure);
        assert!(PlanError::not_found("board", "x").is_not_found());
    }

    #[test]
    fn test_retryable() {
        assert!(PlanError::LockBusy.is_retryable());
        assert!(!PlanError::not_found("card", "x").is_retryable());
    }
}
