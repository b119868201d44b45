use crate::config::types::{Config, CrawlerConfig, OutputConfig, SourceConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates engine tuning parameters
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 500 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 500, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page_limit must be >= 1, got {}",
            config.page_limit
        )));
    }

    if config.rate_limit_cooldown_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_cooldown_ms must be >= 100ms, got {}ms",
            config.rate_limit_cooldown_ms
        )));
    }

    if config.retry_status_codes.contains(&429) {
        return Err(ConfigError::Validation(
            "429 is handled by the rate-limit pause and must not appear in retry_status_codes"
                .to_string(),
        ));
    }

    for code in &config.retry_status_codes {
        if *code < 400 || *code > 599 {
            return Err(ConfigError::Validation(format!(
                "retry_status_codes entries must be 4xx/5xx, got {}",
                code
            )));
        }
    }

    Ok(())
}

/// Validates the source section
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.id.is_empty() {
        return Err(ConfigError::Validation(
            "source id cannot be empty".to_string(),
        ));
    }

    if !config
        .id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "source id must contain only alphanumeric characters, hyphens, and underscores, got '{}'",
            config.id
        )));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use HTTPS scheme",
            config.base_url
        )));
    }

    match (config.start_id, config.end_id) {
        (Some(start), Some(end)) if start >= end => {
            return Err(ConfigError::Validation(format!(
                "start_id ({}) must be less than end_id ({})",
                start, end
            )));
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ConfigError::Validation(
                "start_id and end_id must be given together".to_string(),
            ));
        }
        _ => {}
    }

    match (config.proxy_start, config.proxy_end) {
        (Some(start), Some(end)) if start >= end => {
            return Err(ConfigError::Validation(format!(
                "proxy_start ({}) must be less than proxy_end ({})",
                start, end
            )));
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ConfigError::Validation(
                "proxy_start and proxy_end must be given together".to_string(),
            ));
        }
        _ => {}
    }

    Ok(())
}

/// Validates output paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records_path cannot be empty".to_string(),
        ));
    }

    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
