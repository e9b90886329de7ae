//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Pager CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Engine configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through a data file with the paging engine
    Page {
        /// Data file (JSON array of items)
        #[arg(short, long)]
        data: PathBuf,

        /// Case-insensitive search text
        #[arg(short, long)]
        search: Option<String>,

        /// Items per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,

        /// Maximum number of pages to fetch
        #[arg(long, default_value = "1")]
        pages: usize,
    },

    /// Load a data file chunk by chunk with the chunking engine
    Scroll {
        /// Data file (JSON array of items)
        #[arg(short, long)]
        data: PathBuf,

        /// Case-insensitive search text
        #[arg(short, long)]
        search: Option<String>,

        /// Items per chunk (defaults to the configured chunk size)
        #[arg(long)]
        limit: Option<u32>,

        /// Maximum number of chunks to fetch
        #[arg(long, default_value = "3")]
        chunks: usize,
    },

    /// Print the effective engine configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Pretty-printed JSON
    Pretty,
}
