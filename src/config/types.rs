use crate::url::OriginMatch;
use crate::ConfigError;
use serde::Deserialize;

/// Label shown next to the crawl progress fraction
pub const DEFAULT_PROGRESS_LABEL: &str = "Operation in progress. Please wait.";

/// Main configuration structure for Site-Ingest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingestion: Option<IngestionConfig>,
    #[serde(default)]
    pub lookup: LookupConfig,
}

impl Config {
    /// Returns the `[ingestion]` section, which only upload modes require
    pub fn ingestion(&self) -> Result<&IngestionConfig, ConfigError> {
        self.ingestion
            .as_ref()
            .ok_or(ConfigError::MissingSection("ingestion"))
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Upper bound for a single request, in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Upper bound for establishing a connection, in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every page request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("site-ingest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Traversal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// How discovered links are matched against the origin
    #[serde(rename = "origin-match")]
    pub origin_match: OriginMatch,

    /// Progress step used when the origin's page has no same-origin links
    #[serde(rename = "min-progress-step")]
    pub min_progress_step: f64,

    /// Label passed to the progress sink with every update
    #[serde(rename = "progress-label")]
    pub progress_label: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            origin_match: OriginMatch::Substring,
            min_progress_step: 0.01,
            progress_label: DEFAULT_PROGRESS_LABEL.to_string(),
        }
    }
}

/// Persistent state configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database backing the artifact cache
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory that receives `<host>.txt` staging files before upload
    #[serde(rename = "staging-dir")]
    pub staging_dir: String,

    /// Name of the ordered index holding artifact recency
    #[serde(rename = "recency-key")]
    pub recency_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./site-ingest.db".to_string(),
            staging_dir: "./data".to_string(),
            recency_key: "vs_files".to_string(),
        }
    }
}

/// Ingestion collaborator configuration (OpenAI-compatible files API)
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    /// Base URL of the API, e.g. `https://api.openai.com/v1`
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// Environment variable holding the bearer token
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Vector store the uploaded artifacts are registered with
    #[serde(rename = "vector-store-id")]
    pub vector_store_id: String,

    /// Purpose attached to uploaded files
    #[serde(default = "default_purpose")]
    pub purpose: String,
}

impl IngestionConfig {
    /// Reads the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.api_key_env)
            .map_err(|_| ConfigError::MissingEnv(self.api_key_env.clone()))
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_purpose() -> String {
    "assistants".to_string()
}

/// Account lookup collaborator configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the XRPScan-compatible account API
    #[serde(rename = "api-base")]
    pub api_base: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.xrpscan.com".to_string(),
        }
    }
}
