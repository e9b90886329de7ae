//! Tests for query module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// PageRef Tests
// ============================================================================

#[test]
fn test_page_ref_first() {
    let first = PageRef::first();
    assert!(first.cursor.is_none());
    assert!(first.offset.is_none());
    assert!(first.is_first());
    assert_eq!(first, PageRef::default());
}

#[test]
fn test_page_ref_builders() {
    let by_offset = PageRef::offset(48);
    assert_eq!(by_offset.offset, Some(48));
    assert!(!by_offset.is_first());

    let by_cursor = PageRef::cursor("abc");
    assert_eq!(by_cursor.cursor.as_deref(), Some("abc"));
    assert!(!by_cursor.is_first());

    let both = PageRef::cursor("abc").with_offset(10);
    assert_eq!(both.cursor.as_deref(), Some("abc"));
    assert_eq!(both.offset, Some(10));

    assert!(PageRef::offset(0).is_first());
}

// ============================================================================
// PageQuery Tests
// ============================================================================

#[test]
fn test_page_query_default() {
    let query: PageQuery<String> = PageQuery::default();
    assert!(query.search.is_none());
    assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(query.page_size, 24);
    assert!(query.page_ref.is_first());
}

#[test]
fn test_page_query_structural_equality() {
    let a = PageQuery::new(10).with_search("rust".to_string());
    let b = PageQuery::new(10).with_search("rust".to_string());
    assert_eq!(a, b);

    let c = b.clone().with_ref(PageRef::offset(10));
    assert_ne!(a, c);

    let d = a.clone().with_search(None);
    assert_ne!(a, d);
}

#[test]
fn test_page_query_serialization_uses_ref_key() {
    let query = PageQuery::new(5)
        .with_search("a".to_string())
        .with_ref(PageRef::offset(5));
    let value = serde_json::to_value(&query).unwrap();
    assert_eq!(
        value,
        json!({"search": "a", "page_size": 5, "ref": {"offset": 5}})
    );

    let restored: PageQuery<String> = serde_json::from_value(json!({"search": "a"})).unwrap();
    assert_eq!(restored.page_size, DEFAULT_PAGE_SIZE);
    assert!(restored.page_ref.is_first());
}

// ============================================================================
// Navigation Tests
// ============================================================================

#[test]
fn test_next_page_follows_result_ref() {
    let query: PageQuery<String> = PageQuery::new(3);
    let result = PageResult::new(vec![1, 2, 3], Some(3), PageRef::cursor("c3").with_offset(3));

    let next = query.next_page(&result);
    assert_eq!(next.page_ref, PageRef::cursor("c3").with_offset(3));
    assert_eq!(next.page_size, 3);
}

#[test_case(0, 10, None ; "first page stays first")]
#[test_case(10, 10, None ; "second page goes to first")]
#[test_case(25, 10, Some(15) ; "mid sequence steps back one page")]
#[test_case(5, 10, None ; "partial page saturates")]
fn test_previous_page(offset: u64, page_size: u32, expected: Option<u64>) {
    let query: PageQuery<String> = PageQuery::new(page_size).with_ref(PageRef::offset(offset));
    let previous = query.previous_page();
    assert_eq!(previous.page_ref.offset, expected);
    assert!(previous.page_ref.cursor.is_none());
}

#[test]
fn test_first_page_resets_ref() {
    let query: PageQuery<String> = PageQuery::new(10).with_ref(PageRef::cursor("x").with_offset(40));
    assert!(query.first_page().page_ref.is_first());
}

#[test_case(Some(0), 3, false ; "known empty next page")]
#[test_case(Some(5), 3, true ; "known non-empty next page")]
#[test_case(None, 3, true ; "unknown count after full page")]
#[test_case(None, 0, false ; "unknown count after empty page")]
fn test_paging_has_more(next_item_count: Option<u64>, page_len: usize, expected: bool) {
    let state: PagingState<usize, String> = PagingState {
        query: PageQuery::new(3),
        result: PageResult::new((0..page_len).collect(), next_item_count, PageRef::first()),
        is_stale: false,
    };
    assert_eq!(state.has_more(), expected);
}

#[test_case(0, 24, 1 ; "first page")]
#[test_case(24, 24, 2 ; "second page")]
#[test_case(50, 10, 6 ; "offset inside page")]
fn test_page_number(offset: u64, page_size: u32, expected: u64) {
    let state: PagingState<u8, String> =
        PagingState::with_query(PageQuery::new(page_size).with_ref(PageRef::offset(offset)));
    assert_eq!(state.page_number(), expected);
    assert_eq!(state.has_previous(), offset > 0);
}

#[test]
fn test_item_range() {
    let state: PagingState<u8, String> = PagingState {
        query: PageQuery::new(4).with_ref(PageRef::offset(8)),
        result: PageResult::new(vec![1, 2, 3], None, PageRef::offset(11)),
        is_stale: false,
    };
    assert_eq!(state.item_range(), 8..11);
}

#[test]
fn test_chunking_has_more() {
    let mut state: ChunkingState<String> = ChunkingState::default();
    assert!(state.has_more());

    state.next_item_count = Some(2);
    assert!(state.has_more());

    state.next_item_count = Some(0);
    assert!(!state.has_more());
}

// ============================================================================
// Snapshot Tests
// ============================================================================

#[test]
fn test_fresh_snapshots() {
    let paging: PagingState<String, String> = PagingState::default();
    assert!(!paging.is_stale);
    assert!(paging.result.is_empty());
    assert_eq!(paging.query, PageQuery::default());

    let chunking: ChunkingState<String> = ChunkingState::default();
    assert!(!chunking.is_stale);
    assert!(chunking.search.is_none());
    assert!(chunking.next_item_count.is_none());
    assert!(chunking.next_ref.is_first());
}
