use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Timeouts are not 0
/// - Result cap is non-zero and within the request limit
/// - Cache thresholds are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.covers.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "covers.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.catalog.max_results == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.max_results cannot be 0".to_string(),
        ));
    }

    if config.catalog.max_results > config.catalog.request_limit as usize {
        return Err(ConfigError::ValidationError(format!(
            "catalog.max_results ({}) exceeds catalog.request_limit ({})",
            config.catalog.max_results, config.catalog.request_limit
        )));
    }

    if config.cache.min_valid_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "cache.min_valid_bytes cannot be 0".to_string(),
        ));
    }

    if config.cache.max_age_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.max_age_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
