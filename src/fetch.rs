//! Fetch contract between the engines and a data source
//!
//! A fetcher turns a [`PageQuery`] into a [`PageResult`]. The three outcomes
//! the engines distinguish are:
//!
//! - `Ok(Some(result))` - the page was retrieved
//! - `Ok(None)` - the fetch was declined without an error; not recorded
//! - `Err(e)` - a failure; `Error::Cancelled` propagates to the caller,
//!   anything else lands in the engine's error log

use crate::error::Result;
use crate::query::{PageQuery, PageResult};
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Outcome of one fetch call
pub type FetchOutcome<Item> = Result<Option<PageResult<Item>>>;

/// Asynchronous page source supplied by the caller
#[async_trait]
pub trait Fetcher<Item, Search>: Send + Sync
where
    Item: Send + 'static,
    Search: Send + 'static,
{
    /// Fetch the page described by `query`
    async fn fetch(&self, query: PageQuery<Search>) -> FetchOutcome<Item>;
}

/// Shared, type-erased fetcher as held by the engines
pub type SharedFetcher<Item, Search> = Arc<dyn Fetcher<Item, Search>>;

/// Fetcher backed by an async closure
///
/// Built with [`fetch_fn`].
pub struct FnFetcher<F, Item, Search> {
    f: F,
    _marker: PhantomData<fn(PageQuery<Search>) -> Item>,
}

/// Adapt an async closure into a [`Fetcher`]
///
/// ```rust,ignore
/// let fetcher = fetch_fn(|query: PageQuery<String>| async move {
///     Ok(Some(PageResult::new(vec![1, 2, 3], Some(0), PageRef::offset(3))))
/// });
/// ```
pub fn fetch_fn<F, Fut, Item, Search>(f: F) -> FnFetcher<F, Item, Search>
where
    F: Fn(PageQuery<Search>) -> Fut + Send + Sync,
    Fut: Future<Output = FetchOutcome<Item>> + Send + 'static,
{
    FnFetcher {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, Item, Search> Fetcher<Item, Search> for FnFetcher<F, Item, Search>
where
    F: Fn(PageQuery<Search>) -> Fut + Send + Sync,
    Fut: Future<Output = FetchOutcome<Item>> + Send + 'static,
    Item: Send + 'static,
    Search: Send + 'static,
{
    async fn fetch(&self, query: PageQuery<Search>) -> FetchOutcome<Item> {
        (self.f)(query).await
    }
}

#[async_trait]
impl<T, Item, Search> Fetcher<Item, Search> for Arc<T>
where
    T: Fetcher<Item, Search> + ?Sized,
    Item: Send + 'static,
    Search: Send + 'static,
{
    async fn fetch(&self, query: PageQuery<Search>) -> FetchOutcome<Item> {
        (**self).fetch(query).await
    }
}
