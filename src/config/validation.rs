use crate::config::types::{Config, CrawlConfig, FetcherConfig, OutputConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl section
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_root_url(&config.root_url)?;

    if let (Some(earliest), Some(latest)) = (config.earliest, config.latest) {
        if earliest > latest {
            return Err(ConfigError::Validation(format!(
                "earliest ({}) must not be after latest ({})",
                earliest, latest
            )));
        }
    }

    if config.pacing_delay == 0 {
        return Err(ConfigError::Validation(
            "pacing-delay must be greater than 0ms".to_string(),
        ));
    }

    Ok(())
}

/// Validates the root URL: must parse and use HTTP(S)
pub fn validate_root_url(root_url: &str) -> Result<(), ConfigError> {
    let trimmed = root_url.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Validation(
            "root-url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root-url '{}': {}", trimmed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "root-url '{}' must use HTTP or HTTPS",
            trimmed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "root-url '{}' has no host",
            trimmed
        )));
    }

    Ok(())
}

/// Validates the fetcher section
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout == 0 {
        return Err(ConfigError::Validation(
            "timeout must be at least 1 second".to_string(),
        ));
    }

    for (key, value) in [
        ("document-path", &config.document_path),
        ("document-param", &config.document_param),
        ("folder-path", &config.folder_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
        }
    }

    Selector::parse(&config.breadcrumb_selector).map_err(|e| {
        ConfigError::Validation(format!(
            "breadcrumb-selector '{}' is not a valid CSS selector: {:?}",
            config.breadcrumb_selector, e
        ))
    })?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.summary_path.as_deref(), Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    if matches!(config.database_path.as_deref(), Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
