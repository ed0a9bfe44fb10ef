use crate::config::types::{ApiConfig, Config, CrawlerConfig, OutputConfig};
use crate::resolver::DateRange;
use crate::ConfigError;

/// Upper bound on the request budget; the public service asks crawlers to stay slow
const MAX_REQUESTS_PER_SECOND: f64 = 10.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    DateRange::from_config(&config.date_range)?;
    validate_defaults(config)?;
    Ok(())
}

/// Validates the base URL segments
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = config.root_url()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "host '{}' must use http or https",
            config.host
        )));
    }

    for (name, segment) in [
        ("api-name", &config.api_name),
        ("api-version", &config.api_version),
        ("language", &config.language),
    ] {
        validate_segment(name, segment)?;
    }

    if !config.database_id.is_empty() {
        validate_segment("database-id", &config.database_id)?;
    }

    Ok(())
}

fn validate_segment(name: &str, segment: &str) -> Result<(), ConfigError> {
    if segment.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }

    if segment.contains('/') {
        return Err(ConfigError::Validation(format!(
            "{} must be a single path segment, got '{}'",
            name, segment
        )));
    }

    Ok(())
}

/// Validates request behavior configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !config.requests_per_second.is_finite()
        || config.requests_per_second <= 0.0
        || config.requests_per_second > MAX_REQUESTS_PER_SECOND
    {
        return Err(ConfigError::Validation(format!(
            "requests-per-second must be in (0, {}], got {}",
            MAX_REQUESTS_PER_SECOND, config.requests_per_second
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    for label in &config.fallback_encodings {
        if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
            return Err(ConfigError::Validation(format!(
                "Unknown fallback encoding '{}'",
                label
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.format.is_empty() {
        return Err(ConfigError::Validation(
            "output format cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the default selections table
fn validate_defaults(config: &Config) -> Result<(), ConfigError> {
    for (name, values) in &config.defaults {
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "default variable name cannot be empty".to_string(),
            ));
        }

        if values.clone().into_vec().is_empty() {
            return Err(ConfigError::Validation(format!(
                "default for '{}' must list at least one value",
                name
            )));
        }
    }

    Ok(())
}
