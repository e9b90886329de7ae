//! Paging engine module
//!
//! Query-addressable fetch orchestration with full-page replacement.
//!
//! # Overview
//!
//! The engine holds one [`PagingState`]. Query edits mark it stale at once;
//! fetches run without any lock held, so several may be in flight at the
//! same time. When a fetch completes, its result is committed only if the
//! query it was fetched for is still the current query. Late results for a
//! superseded query are dropped, never blocked on.
//!
//! ```text
//!   fresh ──edit──▶ stale ──fetch(query) completes──▶ settled
//!                     ▲                                  │
//!                     └──────────────edit────────────────┘
//! ```

use crate::config::PagerConfig;
use crate::error::Result;
use crate::fetch::SharedFetcher;
use crate::observe::{ErrorLog, InFlight, Observable, RecordedError};
use crate::query::{PageQuery, PageResult, PagingState};
use std::fmt;
use tokio::sync::watch;

/// Paging engine over a caller-supplied fetcher
pub struct PagingEngine<Item, Search>
where
    Item: Send + 'static,
    Search: Send + 'static,
{
    /// Fetch function
    fetcher: SharedFetcher<Item, Search>,
    /// Current snapshot; writes go through the cell's exclusive lock
    state: Observable<PagingState<Item, Search>>,
    /// Fetches awaiting the fetcher
    in_flight: InFlight,
    /// Recoverable fetch failures
    errors: ErrorLog,
    /// Engine configuration
    config: PagerConfig,
}

impl<Item, Search> PagingEngine<Item, Search>
where
    Item: Clone + Send + Sync + 'static,
    Search: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new paging engine with the default configuration
    pub fn new(fetcher: SharedFetcher<Item, Search>) -> Self {
        Self::with_config(fetcher, PagerConfig::default())
    }

    /// Create a new paging engine with the given configuration
    pub fn with_config(fetcher: SharedFetcher<Item, Search>, config: PagerConfig) -> Self {
        let initial = PagingState::with_query(PageQuery::new(config.default_page_size));
        Self {
            fetcher,
            state: Observable::new(initial),
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
    pub fn state(&self) -> PagingState<Item, Search> {
        self.state.get()
    }

    /// Current query
    pub fn query(&self) -> PageQuery<Search> {
        self.state.with(|state| state.query.clone())
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<PagingState<Item, Search>> {
        self.state.subscribe()
    }

    /// Whether any fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_loading()
    }

    /// Number of fetches in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.count()
    }

    /// Subscribe to in-flight count changes
    pub fn subscribe_loading(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }

    /// Recorded fetch failures
    pub fn errors(&self) -> Vec<RecordedError> {
        self.errors.snapshot()
    }

    /// Drain recorded fetch failures
    pub fn take_errors(&self) -> Vec<RecordedError> {
        self.errors.take()
    }

    /// Subscribe to error log changes
    pub fn subscribe_errors(&self) -> watch::Receiver<Vec<RecordedError>> {
        self.errors.subscribe()
    }

    // ========================================================================
    // Query Edits
    // ========================================================================

    /// Replace the query without fetching
    ///
    /// `transform` sees a snapshot of the current state and may read the
    /// engine. If the query it returns differs from the current one, the
    /// snapshot becomes `{ query: new, result: unchanged, is_stale: true }`;
    /// otherwise nothing is published. When another edit lands between the
    /// snapshot and the publish, `transform` runs again on the newer state.
    pub fn edit_query<F>(&self, transform: F)
    where
        F: FnMut(&PagingState<Item, Search>) -> PageQuery<Search>,
    {
        self.accept_query(transform);
    }

    /// Set the search value and go back to the first page, without fetching
    pub fn search(&self, search: Option<Search>) {
        self.edit_query(|state| {
            state
                .query
                .clone()
                .with_search(search.clone())
                .first_page()
        });
    }

    /// Apply `transform` to a snapshot and publish the query it produced
    ///
    /// The publish only happens if the query is still the one `transform`
    /// saw; otherwise it retries against the newer state.
    fn accept_query<F>(&self, mut transform: F) -> PageQuery<Search>
    where
        F: FnMut(&PagingState<Item, Search>) -> PageQuery<Search>,
    {
        loop {
            let snapshot = self.state.get();
            let query = transform(&snapshot);

            let mut raced = false;
            let changed = self.state.update_if(|state| {
                if state.query != snapshot.query {
                    raced = true;
                    return false;
                }
                if state.query == query {
                    return false;
                }
                state.query = query.clone();
                state.is_stale = true;
                true
            });

            if raced {
                tracing::trace!("paging query edited concurrently, retrying");
                continue;
            }
            if changed {
                tracing::debug!(
                    page_size = query.page_size,
                    offset = ?query.page_ref.offset,
                    "paging query changed, state marked stale"
                );
            }
            return query;
        }
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Fetch the current query
    pub async fn fetch(&self) -> Result<bool> {
        self.fetch_with(|state| state.query.clone()).await
    }

    /// Fetch the page after the committed result
    pub async fn fetch_next_page(&self) -> Result<bool> {
        self.fetch_with(|state| state.query.clone().next_page(&state.result))
            .await
    }

    /// Fetch the page before the current query
    pub async fn fetch_previous_page(&self) -> Result<bool> {
        self.fetch_with(|state| state.query.clone().previous_page())
            .await
    }

    /// Apply `transform` like [`edit_query`](Self::edit_query), then fetch the
    /// resulting query
    ///
    /// Returns:
    /// - `Ok(true)` when the fetcher produced a result, whether or not it was
    ///   committed (a result for a superseded query is discarded)
    /// - `Ok(false)` when the fetch was declined or failed while its query is
    ///   still current
    /// - `Ok(true)` when it was declined or failed but a newer query has
    ///   already replaced it
    /// - `Err(Error::Cancelled)` when the fetcher was cancelled
    ///
    /// No lock is held while the fetcher runs.
    pub async fn fetch_with<F>(&self, transform: F) -> Result<bool>
    where
        F: FnMut(&PagingState<Item, Search>) -> PageQuery<Search>,
    {
        let fetch_query = self.accept_query(transform);

        let outcome = {
            let _slot = self.in_flight.enter();
            if self.config.log_fetches {
                tracing::debug!(
                    page_size = fetch_query.page_size,
                    offset = ?fetch_query.page_ref.offset,
                    cursor = ?fetch_query.page_ref.cursor,
                    in_flight = self.in_flight.count(),
                    "paging fetch started"
                );
            }
            self.fetcher.fetch(fetch_query.clone()).await
        };

        match outcome {
            Ok(Some(result)) => {
                self.commit(fetch_query, result);
                Ok(true)
            }
            Ok(None) => {
                tracing::trace!("paging fetch declined");
                Ok(self.is_superseded(&fetch_query))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "paging fetch failed");
                self.errors.record(e);
                Ok(self.is_superseded(&fetch_query))
            }
        }
    }

    /// Commit `result` if `fetch_query` is still the current query
    fn commit(&self, fetch_query: PageQuery<Search>, result: PageResult<Item>) {
        let item_count = result.items.len();
        let committed = self.state.update_if(|state| {
            if state.query != fetch_query {
                return false;
            }
            *state = PagingState {
                query: fetch_query,
                result,
                is_stale: false,
            };
            true
        });

        if committed {
            if self.config.log_fetches {
                tracing::debug!(items = item_count, "paging result committed");
            }
        } else {
            tracing::debug!(
                items = item_count,
                "paging result discarded, query superseded while in flight"
            );
        }
    }

    /// Whether a newer query has replaced `fetch_query`
    fn is_superseded(&self, fetch_query: &PageQuery<Search>) -> bool {
        self.state.with(|state| state.query != *fetch_query)
    }
}

impl<Item, Search> fmt::Debug for PagingEngine<Item, Search>
where
    Item: Send + 'static,
    Search: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingEngine")
            .field("in_flight", &self.in_flight.count())
            .field("errors", &self.errors.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
