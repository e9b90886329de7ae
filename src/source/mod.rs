//! Data source module
//!
//! Fetcher implementations that serve pages from data already in memory.
//!
//! # Overview
//!
//! `MemorySource` pages through an owned item list with offset and cursor
//! references, filtering by a caller-supplied search predicate. It backs the
//! CLI and is handy for tests and demos; real applications supply their own
//! [`Fetcher`](crate::fetch::Fetcher).

mod memory;

pub use memory::{json_matches, MemorySource};
