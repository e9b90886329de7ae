//! Chunking engine module
//!
//! Append-oriented fetch orchestration for growing lists (infinite scroll).
//!
//! # Overview
//!
//! The engine holds one [`ChunkingState`] plus an append-only item
//! sequence. Every operation takes a single non-reentrant async mutex for
//! its whole body, including the awaited fetch, so operations queue and run
//! strictly one at a time.
//!
//! `fetch` publishes the new search as stale before fetching. `fetch_more`
//! captures the stale flag before fetching: if a `fetch` never produced
//! items, whichever `fetch_more` runs next resets the sequence first. The
//! sequence is reset exactly once per fresh search.

use crate::config::PagerConfig;
use crate::error::Result;
use crate::fetch::{FetchOutcome, SharedFetcher};
use crate::observe::{ErrorLog, InFlight, Observable, RecordedError};
use crate::query::{ChunkingState, PageQuery, PageRef, PageResult};
use std::fmt;
use tokio::sync::{watch, Mutex};

/// Chunking engine over a caller-supplied fetcher
pub struct ChunkingEngine<Item, Search>
where
    Item: Send + 'static,
    Search: Send + 'static,
{
    /// Fetch function
    fetcher: SharedFetcher<Item, Search>,
    /// Current snapshot
    state: Observable<ChunkingState<Search>>,
    /// Accumulated items
    items: Observable<Vec<Item>>,
    /// Serializes whole operations, held across the fetch
    lock: Mutex<()>,
    /// Fetches awaiting the fetcher (never more than one)
    in_flight: InFlight,
    /// Recoverable fetch failures
    errors: ErrorLog,
    /// Engine configuration
    config: PagerConfig,
}

impl<Item, Search> ChunkingEngine<Item, Search>
where
    Item: Clone + Send + Sync + 'static,
    Search: Clone + Send + Sync + 'static,
{
    /// Create a new chunking engine with the default configuration
    pub fn new(fetcher: SharedFetcher<Item, Search>) -> Self {
        Self::with_config(fetcher, PagerConfig::default())
    }

    /// Create a new chunking engine with the given configuration
    pub fn with_config(fetcher: SharedFetcher<Item, Search>, config: PagerConfig) -> Self {
        Self {
            fetcher,
            state: Observable::new(ChunkingState::default()),
            items: Observable::new(Vec::new()),
            lock: Mutex::new(()),
            in_flight: InFlight::new(),
            errors: ErrorLog::new(),
            config,
        }
    }

    /// Get the engine configuration
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Current snapshot
    pub fn state(&self) -> ChunkingState<Search> {
        self.state.get()
    }

    /// Clone of the accumulated items
    pub fn items(&self) -> Vec<Item> {
        self.items.get()
    }

    /// Number of accumulated items
    pub fn item_count(&self) -> usize {
        self.items.with(Vec::len)
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<ChunkingState<Search>> {
        self.state.subscribe()
    }

    /// Subscribe to item sequence changes
    pub fn subscribe_items(&self) -> watch::Receiver<Vec<Item>> {
        self.items.subscribe()
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_loading()
    }

    /// Recorded fetch failures
    pub fn errors(&self) -> Vec<RecordedError> {
        self.errors.snapshot()
    }

    /// Drain recorded fetch failures
    pub fn take_errors(&self) -> Vec<RecordedError> {
        self.errors.take()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Start a fresh sequence for `search`
    ///
    /// The new search is published with `is_stale: true` before the fetcher
    /// runs and stays published even if the fetch fails. On success the item
    /// sequence is replaced by the fetched chunk.
    ///
    /// Returns `Ok(false)` when the fetch was declined or failed (items are
    /// left untouched) and `Err(Error::Cancelled)` on cancellation.
    pub async fn fetch(&self, search: Option<Search>, limit: u32) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let query = PageQuery::new(limit).with_search(search.clone());
        self.state.replace(ChunkingState {
            search: search.clone(),
            next_item_count: None,
            next_ref: PageRef::first(),
            is_stale: true,
        });
        tracing::debug!(limit, "chunking search replaced, state marked stale");

        let Some(result) = self.run(query).await? else {
            return Ok(false);
        };

        let appended = result.items.len();
        self.items.replace(result.items);
        self.state.replace(ChunkingState {
            search,
            next_item_count: result.next_item_count,
            next_ref: result.next_ref,
            is_stale: false,
        });

        if self.config.log_fetches {
            tracing::debug!(items = appended, "chunking sequence reset");
        }
        Ok(true)
    }

    /// Fetch the next chunk and append it
    ///
    /// If the state was stale when this call got the lock, the held items
    /// belong to an older search and are cleared before appending.
    ///
    /// Returns `Ok(false)` when the fetch was declined or failed (state and
    /// items are left as they were) and `Err(Error::Cancelled)` on
    /// cancellation.
    pub async fn fetch_more(&self, limit: u32) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let (was_stale, search, query) = self.state.with(|state| {
            let query = PageQuery::new(limit)
                .with_search(state.search.clone())
                .with_ref(state.next_ref.clone());
            (state.is_stale, state.search.clone(), query)
        });

        let Some(result) = self.run(query).await? else {
            return Ok(false);
        };

        let appended = result.items.len();
        self.items.update(|items| {
            if was_stale {
                items.clear();
            }
            items.extend(result.items);
        });
        self.state.replace(ChunkingState {
            search,
            next_item_count: result.next_item_count,
            next_ref: result.next_ref,
            is_stale: false,
        });

        if self.config.log_fetches {
            tracing::debug!(
                items = appended,
                total = self.item_count(),
                reset = was_stale,
                "chunking sequence extended"
            );
        }
        Ok(true)
    }

    /// Fetch the next chunk using the configured chunk size
    pub async fn fetch_more_default(&self) -> Result<bool> {
        self.fetch_more(self.config.chunk_size).await
    }

    /// Restart the sequence for the current search
    pub async fn refresh(&self, limit: u32) -> Result<bool> {
        let search = self.state.with(|state| state.search.clone());
        self.fetch(search, limit).await
    }

    /// Invoke the fetcher and classify its outcome
    ///
    /// Must be called with the operation lock held.
    async fn run(&self, query: PageQuery<Search>) -> Result<Option<PageResult<Item>>> {
        let outcome: FetchOutcome<Item> = {
            let _slot = self.in_flight.enter();
            if self.config.log_fetches {
                tracing::debug!(
                    limit = query.page_size,
                    cursor = ?query.page_ref.cursor,
                    offset = ?query.page_ref.offset,
                    "chunking fetch started"
                );
            }
            self.fetcher.fetch(query).await
        };

        match outcome {
            Ok(Some(result)) => Ok(Some(result)),
            Ok(None) => {
                tracing::trace!("chunking fetch declined");
                Ok(None)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "chunking fetch failed");
                self.errors.record(e);
                Ok(None)
            }
        }
    }
}

impl<Item, Search> fmt::Debug for ChunkingEngine<Item, Search>
where
    Item: Send + 'static,
    Search: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkingEngine")
            .field("in_flight", &self.in_flight.count())
            .field("errors", &self.errors.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
