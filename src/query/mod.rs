//! Query module
//!
//! Value types shared by both engines: what was requested and what was
//! last retrieved.
//!
//! # Overview
//!
//! - `PageRef` - cursor and/or offset pointer into a page sequence
//! - `PageQuery` - a fetch intent (search, page size, page reference)
//! - `PageResult` - the outcome of one fetch
//! - `PagingState` / `ChunkingState` - the snapshots the engines publish
//!
//! None of these types has behavior beyond equality, copying and the
//! navigation helpers in `nav`.

mod nav;
mod types;

pub use types::{
    ChunkingState, PageQuery, PageRef, PageResult, PagingState, DEFAULT_PAGE_SIZE,
};

#[cfg(test)]
mod tests;
