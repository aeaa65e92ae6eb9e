//! Error types for student storage.
//!
//! Every repository operation returns [`Result`]. The HTTP layer maps each
//! variant onto a client or server error; the cache layer never sees them.

use thiserror::Error;

/// Errors produced by the student repository.
#[derive(Debug, Error)]
pub enum StudentError {
    /// No student exists with the given id.
    #[error("Student '{id}' not found")]
    NotFound {
        /// Identifier that was requested
        id: String,
    },

    /// A field failed validation.
    #[error("Validation error for field '{field}': {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Another student already uses this email address.
    #[error("A student with email '{email}' already exists")]
    DuplicateEmail {
        /// The conflicting address
        email: String,
    },

    /// The storage backend failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudentError {
    /// Creates a NotFound error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a Validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a DuplicateEmail error.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the student was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if this is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateEmail { .. })
    }
}

/// Type alias for Results with StudentError.
pub type Result<T> = std::result::Result<T, StudentError>;
