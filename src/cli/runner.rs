//! CLI runner - executes commands

use crate::chunking::ChunkingEngine;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PagerConfig;
use crate::error::{Error, Result};
use crate::fetch::SharedFetcher;
use crate::observe::RecordedError;
use crate::paging::PagingEngine;
use crate::source::MemorySource;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        let messages = match &self.cli.command {
            Commands::Page {
                data,
                search,
                page_size,
                pages,
            } => {
                let page_size = page_size.unwrap_or(config.default_page_size);
                page(&config, data, search.clone(), page_size, *pages).await?
            }
            Commands::Scroll {
                data,
                search,
                limit,
                chunks,
            } => {
                let limit = limit.unwrap_or(config.chunk_size);
                scroll(&config, data, search.clone(), limit, *chunks).await?
            }
            Commands::Config => vec![json!({
                "type": "CONFIG",
                "config": config
            })],
        };

        for msg in &messages {
            self.output_message(msg);
        }
        Ok(())
    }

    /// Load engine configuration, falling back to defaults
    fn load_config(&self) -> Result<PagerConfig> {
        match &self.cli.config {
            Some(path) => PagerConfig::from_file(path),
            None => Ok(PagerConfig::default()),
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Page through `data` and collect one message per fetched page
async fn page(
    config: &PagerConfig,
    data: &Path,
    search: Option<String>,
    page_size: u32,
    pages: usize,
) -> Result<Vec<Value>> {
    ensure_positive("page_size", page_size)?;
    let source = MemorySource::from_json_file(data)?;
    let fetcher: SharedFetcher<Value, String> = Arc::new(source);
    let engine = PagingEngine::with_config(fetcher, config.clone());
    let mut messages = Vec::new();

    engine.edit_query(|state| {
        state
            .query
            .clone()
            .with_search(search.clone())
            .with_page_size(page_size)
            .first_page()
    });

    for index in 0..pages {
        let fetched = if index == 0 {
            engine.fetch().await?
        } else {
            engine.fetch_next_page().await?
        };

        let state = engine.state();
        messages.extend(error_messages(engine.take_errors()));
        messages.push(json!({
            "type": "PAGE",
            "page": state.page_number(),
            "fetched": fetched,
            "has_more": state.has_more(),
            "state": state,
        }));

        if !fetched || !state.has_more() {
            break;
        }
    }

    tracing::info!(pages = messages.len(), "paging finished");
    Ok(messages)
}

/// Grow a list from `data` and collect one message per fetched chunk
async fn scroll(
    config: &PagerConfig,
    data: &Path,
    search: Option<String>,
    limit: u32,
    chunks: usize,
) -> Result<Vec<Value>> {
    ensure_positive("limit", limit)?;
    let source = MemorySource::from_json_file(data)?;
    let fetcher: SharedFetcher<Value, String> = Arc::new(source);
    let engine = ChunkingEngine::with_config(fetcher, config.clone());
    let mut messages = Vec::new();

    for index in 0..chunks {
        let fetched = if index == 0 {
            engine.fetch(search.clone(), limit).await?
        } else {
            engine.fetch_more(limit).await?
        };

        let state = engine.state();
        messages.extend(error_messages(engine.take_errors()));
        messages.push(json!({
            "type": "CHUNK",
            "chunk": index + 1,
            "fetched": fetched,
            "items": engine.item_count(),
            "has_more": state.has_more(),
            "state": state,
        }));

        if !fetched || !state.has_more() {
            break;
        }
    }

    tracing::info!(items = engine.item_count(), "scrolling finished");
    Ok(messages)
}

fn ensure_positive(field: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::invalid_value(field, "must be positive"));
    }
    Ok(())
}

fn error_messages(errors: Vec<RecordedError>) -> impl Iterator<Item = Value> {
    errors.into_iter().map(|recorded| {
        json!({
            "type": "ERROR",
            "message": recorded.message(),
            "recorded_at": recorded.recorded_at.to_rfc3339(),
        })
    })
}
