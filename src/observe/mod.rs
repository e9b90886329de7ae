//! Observation module
//!
//! Publish/subscribe cells the engines use to expose their state.
//!
//! # Overview
//!
//! - `Observable` - single-writer cell; each transition is one whole snapshot
//! - `ErrorLog` - append-only, caller-drained list of recorded failures
//! - `InFlight` - in-flight fetch counter behind the `is_loading` indicator
//!
//! All three sit on `tokio::sync::watch`, so readers can either poll the
//! latest value or await the next change.

mod cell;
mod errors;
mod loading;

pub use cell::Observable;
pub use errors::{ErrorLog, RecordedError};
pub use loading::{InFlight, InFlightGuard};
