// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy Pager
//!
//! Query-driven paginated retrieval for reactive clients.
//!
//! Given a changing query (search, page size, page position) and an async
//! fetch function, the engines keep a consistent, observable snapshot of
//! what was requested versus what was last retrieved, while tolerating
//! concurrent query edits and fetch failures.
//!
//! ## Features
//!
//! - **Paging**: full-page replacement with concurrent fetches; late
//!   results for superseded queries are dropped
//! - **Chunking**: append-only growth (infinite scroll) with strictly
//!   serialized fetches
//! - **Staleness Tracking**: a query edit is visible as stale the moment it
//!   is accepted
//! - **Observable State**: every transition is published as one snapshot
//!   over `tokio::sync::watch`
//! - **Error Log**: recoverable failures are recorded, cancellation always
//!   propagates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_pager::{fetch_fn, PageQuery, PageRef, PageResult, PagingEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> solidafy_pager::Result<()> {
//!     let fetcher = fetch_fn(|query: PageQuery<String>| async move {
//!         // Call your API here
//!         Ok(Some(PageResult::new(vec![1, 2, 3], Some(0), PageRef::offset(3))))
//!     });
//!     let engine = PagingEngine::new(Arc::new(fetcher));
//!
//!     engine.search(Some("rust".to_string()));
//!     engine.fetch().await?;
//!
//!     let state = engine.state();
//!     println!("{:?} (stale: {})", state.result.items, state.is_stale);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Consumer / UI                        │
//! │   edit_query()  fetch()  fetch_more()   subscribe() → watch  │
//! └──────────────────────────────────────────────────────────────┘
//!                 │                               │
//! ┌───────────────┴──────────────┐ ┌──────────────┴───────────────┐
//! │        PagingEngine          │ │        ChunkingEngine        │
//! │  lock-free fetches           │ │  one fetch at a time         │
//! │  commit if query current     │ │  reset once per new search   │
//! └───────────────┬──────────────┘ └──────────────┬───────────────┘
//!                 └───────────────┬───────────────┘
//!                     Fetcher (caller supplied)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document Error variant fields, then drop this allow

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pager
pub mod error;

/// Query, result and snapshot value types
pub mod query;

/// Observable cells, error log and loading counter
pub mod observe;

/// Fetcher trait and closure adapter
pub mod fetch;

/// Engine configuration
pub mod config;

/// Paging engine (replace-on-fetch)
pub mod paging;

/// Chunking engine (append-on-fetch)
pub mod chunking;

/// In-memory data sources
pub mod source;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use chunking::ChunkingEngine;
pub use config::PagerConfig;
pub use fetch::{fetch_fn, FetchOutcome, Fetcher, SharedFetcher};
pub use observe::RecordedError;
pub use paging::PagingEngine;
pub use query::{ChunkingState, PageQuery, PageRef, PageResult, PagingState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
