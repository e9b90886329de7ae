//! Integration tests for Solidafy Pager
//!
//! These drive the engines through the public API only.

use futures::FutureExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use solidafy_pager::source::MemorySource;
use solidafy_pager::{
    fetch_fn, ChunkingEngine, Error, FetchOutcome, PageQuery, PageRef, PageResult, PagerConfig,
    PagingEngine, SharedFetcher,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Helpers
// ============================================================================

/// Fetcher whose calls block until the test releases them, keyed by page size
#[derive(Clone, Default)]
struct Gates {
    pending: Arc<Mutex<HashMap<u32, oneshot::Receiver<FetchOutcome<u32>>>>>,
}

impl Gates {
    fn gate(&self, page_size: u32) -> oneshot::Sender<FetchOutcome<u32>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert(page_size, rx);
        tx
    }

    fn fetcher(&self) -> SharedFetcher<u32, String> {
        let pending = Arc::clone(&self.pending);
        Arc::new(fetch_fn(move |query: PageQuery<String>| {
            let gate = pending.lock().unwrap().remove(&query.page_size);
            async move {
                match gate {
                    Some(rx) => rx.await.unwrap_or(Err(Error::Cancelled)),
                    None => Ok(None),
                }
            }
        }))
    }
}

fn failing(error: fn() -> Error) -> SharedFetcher<u32, String> {
    Arc::new(fetch_fn(move |_query: PageQuery<String>| async move {
        let outcome: FetchOutcome<u32> = Err(error());
        outcome
    }))
}

fn books() -> Vec<Value> {
    vec![
        json!({"title": "Programming Rust"}),
        json!({"title": "Rust for Rustaceans"}),
        json!({"title": "Zero To Production"}),
        json!({"title": "Rust Atomics and Locks"}),
        json!({"title": "Hands-on Concurrency"}),
        json!({"title": "The Rust Programming Language"}),
    ]
}

// ============================================================================
// Paging Scenarios
// ============================================================================

#[tokio::test]
async fn test_paging_fetch_commits_result() {
    let fetcher: SharedFetcher<u32, String> =
        Arc::new(fetch_fn(|query: PageQuery<String>| async move {
            assert_eq!(query, PageQuery::default());
            Ok(Some(PageResult::new(vec![1u32, 2, 3], Some(0), PageRef::offset(3))))
        }));
    let engine = PagingEngine::new(fetcher);

    assert!(assert_ok!(engine.fetch().await));

    let state = engine.state();
    assert_eq!(state.result.items, vec![1, 2, 3]);
    assert!(!state.is_stale);
    assert!(!state.has_more());
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn test_paging_failure_is_recorded() {
    let engine = PagingEngine::new(failing(|| {
        anyhow::anyhow!("backend unavailable").into()
    }));

    engine.edit_query(|state| state.query.clone().with_page_size(10));
    assert!(!assert_ok!(engine.fetch().await));

    let state = engine.state();
    assert!(state.is_stale);
    assert_eq!(state.query.page_size, 10);

    let errors = engine.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "backend unavailable");
}

#[tokio::test]
async fn test_paging_late_result_is_discarded() {
    let gates = Gates::default();
    let first = gates.gate(10);
    let second = gates.gate(20);
    let engine = PagingEngine::new(gates.fetcher());

    let mut loading = engine.subscribe_loading();
    let mut states = engine.subscribe();

    let driver = async {
        loading.wait_for(|count| *count == 2).await.unwrap();
        second
            .send(Ok(Some(PageResult::new(vec![20], None, PageRef::offset(20)))))
            .unwrap();
        states.wait_for(|state| !state.is_stale).await.unwrap();
        first
            .send(Ok(Some(PageResult::new(vec![10], None, PageRef::offset(10)))))
            .unwrap();
    };

    let (q1, q2, ()) = tokio::join!(
        engine.fetch_with(|state| state.query.clone().with_page_size(10)),
        engine.fetch_with(|state| state.query.clone().with_page_size(20)),
        driver,
    );

    // The superseded fetch still reports success
    assert!(assert_ok!(q1));
    assert!(assert_ok!(q2));

    let state = engine.state();
    assert_eq!(state.query.page_size, 20);
    assert_eq!(state.result.items, vec![20]);
    assert!(!state.is_stale);
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn test_paging_cancellation_propagates() {
    let engine = PagingEngine::new(failing(|| Error::Cancelled));

    engine.search(Some("rust".to_string()));
    let err = assert_err!(engine.fetch().await);

    assert!(err.is_cancelled());
    assert!(engine.errors().is_empty());
    assert!(engine.state().is_stale);
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn test_paging_dropped_fetch_commits_nothing() {
    let gates = Gates::default();
    let release = gates.gate(5);
    let engine = PagingEngine::new(gates.fetcher());

    let pending = engine
        .fetch_with(|state| state.query.clone().with_page_size(5))
        .now_or_never();
    assert!(pending.is_none());
    assert!(!engine.is_loading());

    // The fetcher's result has nowhere to go once the caller is gone
    assert!(release.send(Ok(Some(PageResult::new(vec![1], None, PageRef::first())))).is_err());

    let state = engine.state();
    assert!(state.is_stale);
    assert!(state.result.is_empty());
    assert!(engine.errors().is_empty());
}

#[tokio::test]
async fn test_paging_walks_memory_source() {
    let source = MemorySource::from_json_values(books());
    let fetcher: SharedFetcher<Value, String> = Arc::new(source);
    let engine = PagingEngine::with_config(fetcher, PagerConfig::new().with_default_page_size(2));

    engine.search(Some("rust".to_string()));
    assert!(assert_ok!(engine.fetch().await));
    assert_eq!(engine.state().page_number(), 1);
    assert!(engine.state().has_more());

    assert!(assert_ok!(engine.fetch_next_page().await));
    let state = engine.state();
    assert_eq!(state.page_number(), 2);
    assert_eq!(state.result.items.len(), 2);
    assert!(!state.has_more());

    assert!(assert_ok!(engine.fetch_previous_page().await));
    let state = engine.state();
    assert_eq!(state.page_number(), 1);
    assert_eq!(state.result.items[0], json!({"title": "Programming Rust"}));
}

// ============================================================================
// Chunking Scenarios
// ============================================================================

#[tokio::test]
async fn test_chunking_fetch_then_fetch_more() {
    let fetcher: SharedFetcher<u32, String> =
        Arc::new(fetch_fn(|query: PageQuery<String>| async move {
            assert_eq!(query.search.as_deref(), Some("a"));
            assert_eq!(query.page_size, 5);
            let result = match query.page_ref.offset {
                None => PageResult::new(vec![1u32, 2, 3], Some(2), PageRef::offset(3)),
                Some(_) => PageResult::new(vec![4u32, 5], Some(0), PageRef::offset(5)),
            };
            Ok(Some(result))
        }));
    let engine = ChunkingEngine::new(fetcher);

    assert!(assert_ok!(engine.fetch(Some("a".to_string()), 5).await));
    assert_eq!(engine.state().next_item_count, Some(2));

    assert!(assert_ok!(engine.fetch_more(5).await));
    let state = engine.state();
    assert_eq!(engine.items(), vec![1, 2, 3, 4, 5]);
    assert!(!state.is_stale);
    assert_eq!(state.next_item_count, Some(0));
    assert!(!state.has_more());
}

#[tokio::test]
async fn test_chunking_cancellation_releases_engine() {
    let engine = ChunkingEngine::new(failing(|| Error::Cancelled));

    let err = assert_err!(engine.fetch(Some("a".to_string()), 5).await);
    assert!(err.is_cancelled());
    assert!(engine.errors().is_empty());
    assert!(!engine.is_loading());

    // A second call would deadlock if the lock were still held
    let again = tokio::time::timeout(Duration::from_secs(1), engine.fetch_more(5)).await;
    assert!(assert_ok!(again).is_err());
}

#[tokio::test]
async fn test_chunking_scrolls_memory_source() {
    let source = MemorySource::from_json_values(books()).with_latency(Duration::from_millis(1));
    let fetcher: SharedFetcher<Value, String> = Arc::new(source);
    let engine = ChunkingEngine::with_config(fetcher, PagerConfig::new().with_chunk_size(2));

    assert!(assert_ok!(engine.fetch(Some("rust".to_string()), 2).await));
    while engine.state().has_more() {
        assert!(assert_ok!(engine.fetch_more_default().await));
    }

    assert_eq!(engine.item_count(), 4);
    assert!(!engine.state().is_stale);
    assert!(engine.take_errors().is_empty());
}
