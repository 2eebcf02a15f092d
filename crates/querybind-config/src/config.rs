//! Main configuration type.

use querybind::ExtrasLimits;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingSection};

/// Complete querybind configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use querybind_config::QuerybindConfig;
///
/// let config = QuerybindConfig::default();
/// assert_eq!(config.extras.max_name_len, 20);
/// assert_eq!(config.extras.max_value_len, 255);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct QuerybindConfig {
    /// Bounds applied when recovering unclaimed parameters.
    #[serde(default)]
    pub extras: ExtrasLimits,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl QuerybindConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroExtrasBound` if either extras bound is zero,
    /// or `ConfigError::InvalidLogLevel` if logging is enabled and the level
    /// does not parse as a filter directive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extras.max_name_len == 0 {
            return Err(ConfigError::ZeroExtrasBound {
                field: "extras.max_name_len",
            });
        }

        if self.extras.max_value_len == 0 {
            return Err(ConfigError::ZeroExtrasBound {
                field: "extras.max_value_len",
            });
        }

        if self.logging.enabled {
            querybind_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::InvalidLogLevel {
                    level: self.logging.level.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty logs with source locations, and the binder's own events at
    /// `trace`.
    ///
    /// ```
    /// use querybind_config::{LogFormat, QuerybindConfig};
    ///
    /// let config = QuerybindConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug,querybind=trace".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;

        config
    }

    /// Create a production configuration preset.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.include_location = false;

        config
    }
}
