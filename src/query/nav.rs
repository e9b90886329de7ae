//! Derived navigation
//!
//! Stateless arithmetic layered on the query and state snapshots: where the
//! next and previous pages are, which page number is shown, whether more
//! items exist. Nothing here touches the engines.

use super::types::{ChunkingState, PageQuery, PageRef, PageResult, PagingState};
use std::ops::Range;

impl<Search> PageQuery<Search> {
    /// Same query, pointed at the first page
    #[must_use]
    pub fn first_page(mut self) -> Self {
        self.page_ref = PageRef::first();
        self
    }

    /// Same query, pointed at the page after `result`
    #[must_use]
    pub fn next_page<Item>(mut self, result: &PageResult<Item>) -> Self {
        self.page_ref = result.next_ref.clone();
        self
    }

    /// Same query, pointed one page size back
    ///
    /// Offset based: the cursor is dropped and the offset saturates at zero.
    #[must_use]
    pub fn previous_page(mut self) -> Self {
        let offset = self.offset().saturating_sub(u64::from(self.page_size));
        self.page_ref = if offset == 0 {
            PageRef::first()
        } else {
            PageRef::offset(offset)
        };
        self
    }

    /// Offset of the first item this query asks for
    pub fn offset(&self) -> u64 {
        self.page_ref.offset.unwrap_or(0)
    }
}

/// Shared "are there more items" rule
///
/// A known next count decides on its own. An unknown count only says "no"
/// when the last page came back empty.
fn more_available(next_item_count: Option<u64>, last_page_len: usize) -> bool {
    match next_item_count {
        Some(count) => count > 0,
        None => last_page_len > 0,
    }
}

impl<Item, Search> PagingState<Item, Search> {
    /// Whether a page exists after the current result
    pub fn has_more(&self) -> bool {
        more_available(self.result.next_item_count, self.result.len())
    }

    /// Whether the current query points past the first page
    pub fn has_previous(&self) -> bool {
        self.query.offset() > 0
    }

    /// 1-based page number of the current query
    pub fn page_number(&self) -> u64 {
        if self.query.page_size == 0 {
            return 1;
        }
        self.query.offset() / u64::from(self.query.page_size) + 1
    }

    /// Absolute item positions covered by the committed result
    pub fn item_range(&self) -> Range<u64> {
        let start = self.query.offset();
        start..start + self.result.len() as u64
    }
}

impl<Search> ChunkingState<Search> {
    /// Whether another chunk can be fetched
    ///
    /// Only a reported next count of zero ends the sequence.
    pub fn has_more(&self) -> bool {
        !matches!(self.next_item_count, Some(0))
    }
}
