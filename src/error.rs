//! Unified error handling for the trendcast crate
//!
//! Domain modules carry their own error types ([`StoreError`],
//! [`SchedulerError`]); this module consolidates them into a single
//! [`Error`] enum for paths that cross module boundaries, with a
//! [`category`](Error::category) classification for handling strategies.
//!
//! The propagation policy of the engine lives in the call sites, not here:
//! no error from one tick or one connection's delivery may abort other
//! ticks or other connections. The variants below only travel along
//! startup and request paths.

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::scheduler::SchedulerError;
pub use crate::store::StoreError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Trend store errors
    Storage,
    /// Scheduler and timing errors
    Scheduler,
    /// Network and HTTP errors
    Network,
    /// Serialization errors
    Serialization,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

/// Unified error type for the trendcast crate
#[derive(Error, Debug)]
pub enum Error {
    /// Trend store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Scheduler errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Check if this error is recoverable (the operation can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Store(_) => false,
            Self::Scheduler(_) => false,
            Self::Io(_) => true, // I/O errors are often transient
            Self::Json(_) => false,
            Self::Http(_) => true, // HTTP errors are often transient
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Store(_) => ErrorCategory::Storage,
            Self::Scheduler(_) => ErrorCategory::Scheduler,
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Serialization,
            Self::Http(_) => ErrorCategory::Network,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let store_err = Error::Store(StoreError::NotFound(7));
        assert_eq!(store_err.category(), ErrorCategory::Storage);

        let config_err = Error::config("bad bind address");
        assert_eq!(config_err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_is_recoverable() {
        let store_err = Error::Store(StoreError::NotFound(7));
        assert!(!store_err.is_recoverable());

        let io_err = Error::Io(io::Error::other("transient"));
        assert!(io_err.is_recoverable());
    }

    #[test]
    fn test_store_error_conversion() {
        let unified: Error = StoreError::NotFound(3).into();
        assert!(matches!(unified, Error::Store(StoreError::NotFound(3))));
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("Something went wrong");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.to_string(), "Something went wrong");
    }
}
