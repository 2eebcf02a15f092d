//! Typed configuration for querybind hosts.
//!
//! This crate loads the few knobs a querybind host tunes:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`QuerybindConfig`] holds two sections:
//!
//! - [`ExtrasLimits`](querybind::ExtrasLimits) - bounds for recovering
//!   unclaimed parameters, passed to `Binder::with_extras_limits`
//! - [`LoggingSection`] - logging settings, converted with
//!   [`LoggingSection::to_log_config`] for `querybind_telemetry::init_logging`
//!
//! # Example
//!
//! ```no_run
//! use querybind_config::ConfigLoader;
//!
//! # fn main() -> Result<(), querybind_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("querybind.toml")?
//!     .with_env_prefix("QUERYBIND")
//!     .load()?;
//!
//! println!("extras names up to {} bytes", config.extras.max_name_len);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [extras]
//! max_name_len = 20
//! max_value_len = 255
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! include_location = false
//! service_name = "search-api"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`. For example:
//!
//! - `QUERYBIND__EXTRAS__MAX_VALUE_LEN=512`
//! - `QUERYBIND__LOGGING__LEVEL=debug`
//! - `QUERYBIND__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuerybindConfig::default();
        assert_eq!(config.extras.max_name_len, querybind::DEFAULT_MAX_NAME_LEN);
        assert_eq!(config.extras.max_value_len, querybind::DEFAULT_MAX_VALUE_LEN);
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = QuerybindConfig::development();
        let text = toml::to_string(&config).unwrap();
        let parsed: QuerybindConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed, config);
    }
}
