use super::{types::Config, ConfigError};
use crate::reviews::PLACEHOLDER_POOL_SIZE;

/// Validate configuration.
///
/// Rejects values that would make the service unusable at runtime rather
/// than failing on the first request.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.tmdb.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.api_key must be set".to_string(),
        ));
    }

    if config.tmdb.max_pages == 0 {
        return Err(ConfigError::ValidationError(
            "tmdb.max_pages must be at least 1".to_string(),
        ));
    }

    if config.database.pool_size == 0 {
        return Err(ConfigError::ValidationError(
            "database.pool_size must be at least 1".to_string(),
        ));
    }

    if config.cache.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "cache.capacity must be at least 1".to_string(),
        ));
    }

    if config.catalog.page_size == 0 || config.catalog.platform_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "catalog page sizes must be at least 1".to_string(),
        ));
    }

    if config.catalog.review_floor > PLACEHOLDER_POOL_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "catalog.review_floor cannot exceed {}",
            PLACEHOLDER_POOL_SIZE
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn base_config() -> Config {
        load_config_from_str(
            r#"
[tmdb]
api_key = "key"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = base_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_blank_api_key_fails() {
        let mut config = base_config();
        config.tmdb.api_key = "   ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_pool_fails() {
        let mut config = base_config();
        config.database.pool_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_cache_capacity_fails() {
        let mut config = base_config();
        config.cache.capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_review_floor_above_pool_fails() {
        let mut config = base_config();
        config.catalog.review_floor = PLACEHOLDER_POOL_SIZE + 1;
        assert!(validate_config(&config).is_err());
    }
}
