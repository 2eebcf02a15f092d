//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, QuerybindConfig};

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use querybind_config::ConfigLoader;
///
/// # fn main() -> Result<(), querybind_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("querybind.toml")?
///     .with_env_prefix("QUERYBIND")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: QuerybindConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: QuerybindConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    ///
    /// This is what `new()` does already; it can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = QuerybindConfig::default();
        self
    }

    /// Start with the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = QuerybindConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = QuerybindConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The file contains unknown fields
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string.
    ///
    /// `format` is `"toml"` or `"json"`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    ///
    /// # Example
    ///
    /// ```
    /// use querybind_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [extras]
    ///     max_name_len = 32
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.extras.max_name_len, 32);
    /// assert_eq!(config.extras.max_value_len, 255);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat(format.to_string()))
            }
        };
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Variables use the format `PREFIX__SECTION__KEY`, for example
    /// `QUERYBIND__EXTRAS__MAX_VALUE_LEN=512`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if one exists.
    ///
    /// # Errors
    ///
    /// Currently never fails; a missing `.env` file is ignored.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Ok(self)
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment variable does not parse or
    /// the final configuration is invalid.
    pub fn load(mut self) -> Result<QuerybindConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Return the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> QuerybindConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<QuerybindConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(key_without_prefix) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__"))
        else {
            // Shares the prefix but not the separator, e.g. QUERYBIND_OTHER
            return Ok(());
        };

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            ["EXTRAS", "MAX_NAME_LEN"] => {
                self.config.extras.max_name_len = value
                    .parse()
                    .map_err(|_| ConfigError::env_override(key, "integer"))?;
            }
            ["EXTRAS", "MAX_VALUE_LEN"] => {
                self.config.extras.max_value_len = value
                    .parse()
                    .map_err(|_| ConfigError::env_override(key, "integer"))?;
            }
            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_override(key, "boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_override(key, "'json' or 'pretty'"))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_override(key, "boolean"))?;
            }
            ["LOGGING", "SERVICE_NAME"] => {
                self.config.logging.service_name = value.to_string();
            }

            // Unknown key - ignore
            _ => {}
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.extras.max_name_len, 20);
    }

    #[test]
    fn test_loader_with_development() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.logging.include_location);
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"extras": {"max_value_len": 1024}, "logging": {"level": "warn"}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.extras.max_value_len, 1024);
        assert_eq!(config.extras.max_name_len, 20);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_loader_with_string_unknown_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_loader_rejects_unknown_fields() {
        let toml = r#"
            [extras]
            max_key_len = 10
        "#;

        let result = ConfigLoader::new().with_string(toml, "toml");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/querybind.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/querybind.toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config, QuerybindConfig::default());
    }

    #[test]
    fn test_loader_with_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("querybind.toml");
        fs::write(
            &path,
            "[extras]\nmax_value_len = 64\n\n[logging]\nformat = \"pretty\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(&path).unwrap().load().unwrap();

        assert_eq!(config.extras.max_value_len, 64);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("querybind.json");
        fs::write(&path, r#"{"extras": {"max_name_len": 8}}"#).unwrap();

        let config = ConfigLoader::new()
            .with_optional_file(&path)
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.extras.max_name_len, 8);
    }

    #[test]
    fn test_loader_with_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("querybind.yaml");
        fs::write(&path, "extras: {}").unwrap();

        let result = ConfigLoader::new().with_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_applies_env_prefix() {
        env::set_var("QBLOADTEST__EXTRAS__MAX_VALUE_LEN", "100");
        env::set_var("QBLOADTEST__LOGGING__SERVICE_NAME", "search-api");

        let config = ConfigLoader::new()
            .with_env_prefix("qbloadtest")
            .load()
            .unwrap();

        env::remove_var("QBLOADTEST__EXTRAS__MAX_VALUE_LEN");
        env::remove_var("QBLOADTEST__LOGGING__SERVICE_NAME");

        assert_eq!(config.extras.max_value_len, 100);
        assert_eq!(config.logging.service_name, "search-api");
    }

    #[test]
    fn test_load_validates() {
        let result = ConfigLoader::new()
            .with_string(r#"{"extras": {"max_name_len": 0}}"#, "json")
            .unwrap()
            .load();

        assert!(matches!(result, Err(ConfigError::ZeroExtrasBound { .. })));
    }

    #[test]
    fn test_load_unvalidated_skips_validation() {
        let config = ConfigLoader::new()
            .with_string(r#"{"extras": {"max_name_len": 0}}"#, "json")
            .unwrap()
            .load_unvalidated();

        assert_eq!(config.extras.max_name_len, 0);
    }

    #[test]
    fn test_apply_env_var_extras() {
        let mut loader = ConfigLoader::new();

        loader
            .apply_env_var("QB__EXTRAS__MAX_NAME_LEN", "40", "QB")
            .unwrap();
        loader
            .apply_env_var("QB__EXTRAS__MAX_VALUE_LEN", "80", "QB")
            .unwrap();

        assert_eq!(loader.config.extras.max_name_len, 40);
        assert_eq!(loader.config.extras.max_value_len, 80);
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();

        loader.apply_env_var("QB__LOGGING__FORMAT", "Pretty", "QB").unwrap();
        loader.apply_env_var("QB__LOGGING__ENABLED", "off", "QB").unwrap();
        loader.apply_env_var("QB__LOGGING__LEVEL", "trace", "QB").unwrap();

        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
        assert!(!loader.config.logging.enabled);
        assert_eq!(loader.config.logging.level, "trace");
    }

    #[test]
    fn test_apply_env_var_bad_integer() {
        let mut loader = ConfigLoader::new();

        let err = loader
            .apply_env_var("QB__EXTRAS__MAX_NAME_LEN", "twenty", "QB")
            .unwrap_err();

        assert!(err.to_string().contains("QB__EXTRAS__MAX_NAME_LEN"));
    }

    #[test]
    fn test_apply_env_var_bad_format() {
        let mut loader = ConfigLoader::new();

        let err = loader
            .apply_env_var("QB__LOGGING__FORMAT", "yaml", "QB")
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnvOverride { .. }));
        assert_eq!(err.setting(), Some("QB__LOGGING__FORMAT"));
    }

    #[test]
    fn test_apply_env_var_ignores_unknown_keys() {
        let mut loader = ConfigLoader::new();

        loader.apply_env_var("QB__SERVER__PORT", "80", "QB").unwrap();
        loader.apply_env_var("QB_UNRELATED", "x", "QB").unwrap();

        assert_eq!(loader.config, QuerybindConfig::default());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
