//! Error types for Solidafy Pager
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Fetch failures come in two classes. [`Error::is_fatal`] names the closed
//! set that must always reach the caller (cancellation). Everything else is
//! recoverable: the engines record it in their error log and report the
//! fetch as failed through their boolean return value.

use thiserror::Error;

/// The main error type for Solidafy Pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Fetch cancelled")]
    Cancelled,

    #[error("Fetch failed: {message}")]
    Fetch { message: String },

    #[error("Data source error: {message}")]
    Source { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a data source error
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error must propagate to the caller instead of being recorded
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Check if this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Error::Cancelled
        } else {
            Error::fetch(format!("fetch task panicked: {err}"))
        }
    }
}

/// Result type alias for Solidafy Pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            if inner.is_fatal() {
                return inner;
            }
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            if inner.is_fatal() {
                return inner;
            }
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_value("chunk_size", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'chunk_size': must be positive"
        );

        let err = Error::fetch("timeout");
        assert_eq!(err.to_string(), "Fetch failed: timeout");

        assert_eq!(Error::Cancelled.to_string(), "Fetch cancelled");
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::Cancelled.is_fatal());
        assert!(Error::Cancelled.is_cancelled());

        assert!(!Error::fetch("boom").is_fatal());
        assert!(!Error::source("gone").is_fatal());
        assert!(!Error::config("bad").is_fatal());
        assert!(!Error::Other("other".to_string()).is_fatal());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }

    #[test]
    fn test_context_keeps_cancellation() {
        let result: Result<()> = Err(Error::Cancelled);
        let err = result.with_context(|| "loading page".to_string()).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_join_error_classification() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        handle.abort();
        let err: Error = handle.await.unwrap_err().into();
        assert!(err.is_cancelled());

        let handle = tokio::spawn(async {
            panic!("source exploded");
        });
        let err: Error = handle.await.unwrap_err().into();
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("fetch task panicked"));
    }
}
