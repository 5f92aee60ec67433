//! Site-Ingest: crawl one origin into a single retrieval artifact
//!
//! This crate walks the public pages of a single origin, flattens them into one
//! text blob, and hands that blob to an ingestion collaborator exactly once per
//! origin, remembering the resulting artifact in a persistent cache.

pub mod config;
pub mod crawler;
pub mod ingest;
pub mod lookup;
pub mod pipeline;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Ingest operations
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ingestion failed during {stage}: {message}")]
    Ingestion { stage: IngestStage, message: String },

    #[error("Account lookup failed: {0}")]
    Lookup(#[from] lookup::LookupError),

    #[error("No page of {origin} could be fetched; nothing to ingest")]
    EmptyCrawl { origin: String },
}

impl IngestError {
    /// Builds an ingestion failure for the given stage
    pub fn ingestion(stage: IngestStage, message: impl Into<String>) -> Self {
        Self::Ingestion {
            stage,
            message: message.into(),
        }
    }
}

/// The collaborator call an ingestion failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Upload,
    Registration,
}

impl std::fmt::Display for IngestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Registration => write!(f, "registration"),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing required section: [{0}]")]
    MissingSection(&'static str),

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Site-Ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{aggregate, extract_links, CrawlReport, Crawler, Fetcher};
pub use ingest::{ArtifactCache, ArtifactId, IngestionClient};
pub use state::{PageRecord, ProgressSink, Termination};
pub use url::{extract_company_label, normalize_origin, origin_from_domain, OriginMatch};
