use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix for overrides, e.g. `SHELFCOVER_CACHE__DIR`.
const ENV_PREFIX: &str = "SHELFCOVER_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(path)
}

/// Load configuration, falling back to defaults when the file is missing
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    extract(path)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(path: &Path) -> Result<Config, ConfigError> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[covers]
timeout_secs = 3
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.covers.timeout_secs, 3);
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[cache]
max_age_secs = "three days"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/shelfcover.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let config = load_config_or_default(Path::new("/nonexistent/shelfcover.toml")).unwrap();
        assert_eq!(config.cache.min_valid_bytes, 1000);
        assert_eq!(config.catalog.max_results, 5);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[cache]
dir = "covers"
max_age_secs = 3600

[catalog]
base_url = "http://127.0.0.1:9000"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.cache.max_age_secs, 3600);
        assert_eq!(config.catalog.base_url, "http://127.0.0.1:9000");
        // Untouched sections keep their defaults
        assert_eq!(config.covers.timeout_secs, 5);
    }
}
