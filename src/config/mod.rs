//! Configuration module for Site-Ingest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_ingest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-ingest.toml")).unwrap();
//! println!("Request timeout: {}s", config.fetcher.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, FetcherConfig, IngestionConfig, LookupConfig, StorageConfig,
    DEFAULT_PROGRESS_LABEL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
