//! Recorded fetch failures

use super::cell::Observable;
use crate::error::Error;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

/// A recoverable failure captured by an engine
#[derive(Debug, Clone)]
pub struct RecordedError {
    /// The failure itself
    pub error: Arc<Error>,
    /// When the engine recorded it
    pub recorded_at: DateTime<Utc>,
}

impl RecordedError {
    /// Wrap an error with the current time
    pub fn now(error: Error) -> Self {
        Self {
            error: Arc::new(error),
            recorded_at: Utc::now(),
        }
    }

    /// Display message of the recorded error
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Append-only observable error list
///
/// Unbounded; the consumer drains it with [`ErrorLog::take`].
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Observable<Vec<RecordedError>>,
}

impl ErrorLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error
    pub fn record(&self, error: Error) {
        let entry = RecordedError::now(error);
        self.entries.update(|entries| entries.push(entry));
    }

    /// Clone of all recorded errors, oldest first
    pub fn snapshot(&self) -> Vec<RecordedError> {
        self.entries.get()
    }

    /// Number of recorded errors
    pub fn len(&self) -> usize {
        self.entries.with(Vec::len)
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.with(Vec::is_empty)
    }

    /// Drain all recorded errors
    pub fn take(&self) -> Vec<RecordedError> {
        let mut drained = Vec::new();
        self.entries.update_if(|entries| {
            if entries.is_empty() {
                return false;
            }
            drained = std::mem::take(entries);
            true
        });
        drained
    }

    /// Subscribe to changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<RecordedError>> {
        self.entries.subscribe()
    }
}
