//! In-flight fetch counter

use super::cell::Observable;
use tokio::sync::watch;

/// Counts fetches currently awaiting their fetcher
///
/// `is_loading` is true iff the count is positive. Increments hand out an
/// [`InFlightGuard`] that decrements on drop, so a fetch future dropped
/// mid-await still releases its slot.
#[derive(Debug, Default)]
pub struct InFlight {
    count: Observable<usize>,
}

impl InFlight {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one in-flight fetch
    pub fn enter(&self) -> InFlightGuard<'_> {
        self.count.update(|count| *count += 1);
        InFlightGuard { owner: self }
    }

    /// Current number of in-flight fetches
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Whether any fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.count() > 0
    }

    /// Subscribe to count changes
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }

    fn leave(&self) {
        self.count.update(|count| *count = count.saturating_sub(1));
    }
}

/// Slot held by one in-flight fetch
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.leave();
    }
}
