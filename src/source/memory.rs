//! In-memory page source
//!
//! Serves pages out of an owned item list.

use crate::error::{Error, Result, ResultExt};
use crate::fetch::{FetchOutcome, Fetcher};
use crate::query::{PageQuery, PageRef, PageResult};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

type Matcher<Item, Search> = Arc<dyn Fn(&Item, &Search) -> bool + Send + Sync>;

// ============================================================================
// Memory Source
// ============================================================================

/// Page source over an in-memory list
///
/// Position resolution for a [`PageRef`]:
/// - `offset` wins when present
/// - otherwise `cursor` is read as a decimal position
/// - otherwise the first page
///
/// Every returned page carries a `next_ref` with both cursor and offset set,
/// and `next_item_count = min(page_size, remaining)`.
pub struct MemorySource<Item, Search> {
    /// Source items, in order
    items: Arc<Vec<Item>>,
    /// Whether an item matches a search
    matcher: Matcher<Item, Search>,
    /// Artificial delay before each page is served
    latency: Option<Duration>,
}

impl<Item, Search> MemorySource<Item, Search>
where
    Item: Clone + Send + Sync + 'static,
    Search: Send + Sync + 'static,
{
    /// Create a source that filters with `matcher`
    pub fn new<F>(items: Vec<Item>, matcher: F) -> Self
    where
        F: Fn(&Item, &Search) -> bool + Send + Sync + 'static,
    {
        Self {
            items: Arc::new(items),
            matcher: Arc::new(matcher),
            latency: None,
        }
    }

    /// Create a source that ignores the search value
    pub fn unfiltered(items: Vec<Item>) -> Self {
        Self::new(items, |_, _| true)
    }

    /// Delay every page by `latency`
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Total number of items, before filtering
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the source holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serve one page synchronously
    pub fn page(&self, query: &PageQuery<Search>) -> Result<PageResult<Item>> {
        let matching: Vec<&Item> = match &query.search {
            Some(search) => self
                .items
                .iter()
                .filter(|item| (self.matcher)(*item, search))
                .collect(),
            None => self.items.iter().collect(),
        };

        let start = start_position(&query.page_ref)?.min(matching.len());
        let end = start
            .saturating_add(query.page_size as usize)
            .min(matching.len());
        let remaining = matching.len() - end;

        Ok(PageResult {
            items: matching[start..end].iter().map(|&item| item.clone()).collect(),
            next_item_count: Some(remaining.min(query.page_size as usize) as u64),
            next_ref: PageRef::cursor(end.to_string()).with_offset(end as u64),
        })
    }
}

impl MemorySource<Value, String> {
    /// Create a source over JSON values searched with [`json_matches`]
    pub fn from_json_values(values: Vec<Value>) -> Self {
        Self::new(values, |item: &Value, search: &String| json_matches(item, search))
    }

    /// Load a JSON array file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Parse a JSON array document
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(values) => Ok(Self::from_json_values(values)),
            other => Err(Error::source(format!(
                "expected a JSON array of items, got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[async_trait]
impl<Item, Search> Fetcher<Item, Search> for MemorySource<Item, Search>
where
    Item: Clone + Send + Sync + 'static,
    Search: Send + Sync + 'static,
{
    async fn fetch(&self, query: PageQuery<Search>) -> FetchOutcome<Item> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.page(&query).map(Some)
    }
}

impl<Item, Search> Clone for MemorySource<Item, Search> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            matcher: Arc::clone(&self.matcher),
            latency: self.latency,
        }
    }
}

impl<Item, Search> fmt::Debug for MemorySource<Item, Search> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("len", &self.items.len())
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Resolve the first position a reference points at
fn start_position(page_ref: &PageRef) -> Result<usize> {
    if let Some(offset) = page_ref.offset {
        return Ok(offset as usize);
    }

    match &page_ref.cursor {
        Some(cursor) => cursor
            .parse::<usize>()
            .map_err(|_| Error::source(format!("invalid cursor '{cursor}'"))),
        None => Ok(0),
    }
}

/// Case-insensitive substring match over an item's JSON text
///
/// String values are matched on their content, not their quoted form.
pub fn json_matches(item: &Value, search: &str) -> bool {
    let needle = search.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let haystack = match item {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };
    haystack.contains(&needle)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
