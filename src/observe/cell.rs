//! Observable state cell

use tokio::sync::watch;

/// Single-writer observable cell
///
/// Every write replaces the published value as one snapshot; subscribers
/// never see a partially-updated value. Writes go through the watch
/// channel's internal lock, so the closures passed to `update`/`update_if`
/// run exclusively and must not block.
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    /// Create a cell holding `initial`
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Clone of the current snapshot
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Read the current snapshot without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replace the snapshot, returning the previous one
    pub fn replace(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    /// Modify the snapshot and always notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Modify the snapshot; subscribers are notified only if `f` returns true
    ///
    /// `f` must leave the value untouched when it returns false.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Subscribe to changes
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
