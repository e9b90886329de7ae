//! CLI module
//!
//! Command-line interface for driving the engines over a local data file.
//!
//! # Commands
//!
//! - `page` - Page through results with the paging engine
//! - `scroll` - Grow a list chunk by chunk with the chunking engine
//! - `config` - Print the effective engine configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
