//! Query and result value types
//!
//! Every type here is an immutable value: the engines never mutate a
//! snapshot in place, they build a new one and publish it whole.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 24;

// ============================================================================
// Page Reference
// ============================================================================

/// Pointer into a paginated sequence
///
/// A reference may carry an opaque cursor token, a numeric offset, both, or
/// neither. A reference with neither points at the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRef {
    /// Opaque cursor token (source-defined semantics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    /// Number of items from the start of the sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl PageRef {
    /// Reference to the first page
    pub fn first() -> Self {
        Self::default()
    }

    /// Reference by offset only
    pub fn offset(offset: u64) -> Self {
        Self {
            cursor: None,
            offset: Some(offset),
        }
    }

    /// Reference by cursor only
    pub fn cursor(cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            offset: None,
        }
    }

    /// Add an offset to this reference
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Add a cursor to this reference
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Check if this reference points at the first page
    pub fn is_first(&self) -> bool {
        self.cursor.is_none() && matches!(self.offset, None | Some(0))
    }
}

// ============================================================================
// Page Query
// ============================================================================

/// A fetch intent
///
/// Equality is structural and is the reconciliation key used by the paging
/// engine: a fetched result is only committed if the query it was fetched
/// for still equals the current query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageQuery<Search> {
    /// Search/filter value (caller-defined)
    #[serde(default = "Option::default")]
    pub search: Option<Search>,

    /// Number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Which page to fetch
    #[serde(rename = "ref", default)]
    pub page_ref: PageRef,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl<Search> Default for PageQuery<Search> {
    fn default() -> Self {
        Self {
            search: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_ref: PageRef::default(),
        }
    }
}

impl<Search> PageQuery<Search> {
    /// Create a first-page query with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            search: None,
            page_size,
            page_ref: PageRef::default(),
        }
    }

    /// Replace the search value
    #[must_use]
    pub fn with_search(mut self, search: impl Into<Option<Search>>) -> Self {
        self.search = search.into();
        self
    }

    /// Replace the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Replace the page reference
    #[must_use]
    pub fn with_ref(mut self, page_ref: PageRef) -> Self {
        self.page_ref = page_ref;
        self
    }
}

// ============================================================================
// Page Result
// ============================================================================

/// The outcome of one fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<Item> {
    /// Items on this page, in source order
    #[serde(default = "Vec::new")]
    pub items: Vec<Item>,

    /// Number of items on the next page (`None` = unknown)
    #[serde(default)]
    pub next_item_count: Option<u64>,

    /// Reference to the next page
    #[serde(default)]
    pub next_ref: PageRef,
}

impl<Item> Default for PageResult<Item> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_item_count: None,
            next_ref: PageRef::default(),
        }
    }
}

impl<Item> PageResult<Item> {
    /// Create a result from items and continuation info
    pub fn new(items: Vec<Item>, next_item_count: Option<u64>, next_ref: PageRef) -> Self {
        Self {
            items,
            next_item_count,
            next_ref,
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if this page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Engine Snapshots
// ============================================================================

/// Snapshot published by the paging engine
///
/// When `is_stale` is false, `result` was produced by fetching exactly
/// `query`. When it is true, `query` was changed and no fetch for it has
/// completed yet; `result` is whatever was last committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingState<Item, Search> {
    /// Current query
    pub query: PageQuery<Search>,
    /// Last committed result
    pub result: PageResult<Item>,
    /// Whether `result` does not correspond to `query`
    pub is_stale: bool,
}

impl<Item, Search> Default for PagingState<Item, Search> {
    fn default() -> Self {
        Self {
            query: PageQuery::default(),
            result: PageResult::default(),
            is_stale: false,
        }
    }
}

impl<Item, Search> PagingState<Item, Search> {
    /// Fresh state starting from the given query
    pub fn with_query(query: PageQuery<Search>) -> Self {
        Self {
            query,
            result: PageResult::default(),
            is_stale: false,
        }
    }
}

/// Snapshot published by the chunking engine
///
/// Accumulated items live outside this snapshot in their own observable
/// sequence, because chunking grows the sequence instead of replacing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingState<Search> {
    /// Search the items were (or are being) fetched for
    pub search: Option<Search>,
    /// Number of items on the next chunk (`None` = unknown)
    pub next_item_count: Option<u64>,
    /// Reference to the next chunk
    pub next_ref: PageRef,
    /// Whether the held items do not correspond to `search`
    pub is_stale: bool,
}

impl<Search> Default for ChunkingState<Search> {
    fn default() -> Self {
        Self {
            search: None,
            next_item_count: None,
            next_ref: PageRef::default(),
            is_stale: false,
        }
    }
}
