use crate::config::types::{
    Config, CrawlConfig, FetcherConfig, IngestionConfig, LookupConfig, StorageConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_crawl_config(&config.crawl)?;
    validate_storage_config(&config.storage)?;
    if let Some(ingestion) = &config.ingestion {
        validate_ingestion_config(ingestion)?;
    }
    validate_lookup_config(&config.lookup)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and timeout_secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates traversal configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if !(config.min_progress_step > 0.0 && config.min_progress_step <= 1.0) {
        return Err(ConfigError::Validation(format!(
            "min_progress_step must be in (0, 1], got {}",
            config.min_progress_step
        )));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.staging_dir.is_empty() {
        return Err(ConfigError::Validation(
            "staging_dir cannot be empty".to_string(),
        ));
    }

    if config.recency_key.is_empty() {
        return Err(ConfigError::Validation(
            "recency_key cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates ingestion collaborator configuration
fn validate_ingestion_config(config: &IngestionConfig) -> Result<(), ConfigError> {
    validate_api_base("ingestion.api_base", &config.api_base)?;

    if config.vector_store_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "vector_store_id cannot be empty".to_string(),
        ));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_lookup_config(config: &LookupConfig) -> Result<(), ConfigError> {
    validate_api_base("lookup.api_base", &config.api_base)
}

/// An API base must be an absolute HTTP(S) URL
fn validate_api_base(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} must use http or https, got '{}'",
            field,
            url.scheme()
        )));
    }

    Ok(())
}
