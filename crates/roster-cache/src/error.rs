//! Error types for cache stores.

use std::time::Duration;

/// Errors that can occur when talking to a cache store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend could not be reached or refused the connection.
    #[error("cache backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// The backend answered with an error.
    #[error("cache backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// Connecting took longer than the configured timeout.
    #[error("cache connection timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// A key pattern was malformed.
    #[error("invalid key pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A namespace could not be used as a key prefix.
    #[error("invalid cache namespace '{namespace}': {reason}")]
    InvalidNamespace { namespace: String, reason: String },
}

impl CacheError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new invalid namespace error.
    pub fn invalid_namespace(namespace: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNamespace {
            namespace: namespace.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error comes from losing the backend rather than
    /// from a bad request.
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Unavailable { .. } | Self::Timeout { .. } => true,
            Self::Backend(e) => {
                e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped()
            },
            Self::InvalidPattern { .. } | Self::InvalidNamespace { .. } => false,
        }
    }
}
