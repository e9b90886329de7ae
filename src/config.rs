//! Engine configuration
//!
//! Settings shared by the paging and chunking engines. Loaded from YAML or
//! JSON; every field has a default so an empty document is valid.

use crate::error::{Error, Result, ResultExt};
use crate::query::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for both engines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Page size of the paging engine's initial query
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Chunk size used when a chunking caller does not pass a limit
    #[serde(default = "default_page_size")]
    pub chunk_size: u32,

    /// Whether engines emit a debug event per fetch
    #[serde(default = "default_true")]
    pub log_fetches: bool,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            chunk_size: DEFAULT_PAGE_SIZE,
            log_fetches: true,
        }
    }
}

impl PagerConfig {
    /// Create a default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default page size
    #[must_use]
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Set the chunk size
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Enable or disable per-fetch debug events
    #[must_use]
    pub fn with_log_fetches(mut self, log_fetches: bool) -> Self {
        self.log_fetches = log_fetches;
        self
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    ///
    /// `.json` files are parsed as JSON, everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        if contents.trim().is_empty() {
            return Err(Error::config(format!(
                "config file {} is empty",
                path.display()
            )));
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(Error::invalid_value(
                "default_page_size",
                "page size must be positive",
            ));
        }
        if self.chunk_size == 0 {
            return Err(Error::invalid_value(
                "chunk_size",
                "chunk size must be positive",
            ));
        }
        Ok(())
    }
}
