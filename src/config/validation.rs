use crate::config::types::{Config, FetcherConfig, GroupingConfig, MarketplaceConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_marketplace_config(&config.marketplace)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_grouping_config(&config.grouping)?;
    Ok(())
}

/// Validates the marketplace origin
fn validate_marketplace_config(config: &MarketplaceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must have a host, got '{}'",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 32 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 32, got {}",
            config.max_concurrent_requests
        )));
    }

    Ok(())
}

/// Validates grouping configuration
fn validate_grouping_config(config: &GroupingConfig) -> Result<(), ConfigError> {
    if !config.proximity_threshold.is_finite() || config.proximity_threshold <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "proximity-threshold must be a positive number, got {}",
            config.proximity_threshold
        )));
    }

    if let Some(attribute) = &config.position_attribute {
        if attribute.is_empty()
            || !attribute
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "position-attribute must be a plain attribute name, got '{}'",
                attribute
            )));
        }
    }

    Ok(())
}
