//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`QuerybindConfig`](crate::QuerybindConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file is missing.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file or string layer is not valid TOML, or names a key querybind
    /// does not know.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Same as [`ConfigError::TomlError`], for JSON input.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Neither `toml` nor `json`, by file extension or explicit format.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// An extras bound of zero would drop every unclaimed parameter.
    #[error("invalid configuration value for {field}: must be greater than zero")]
    ZeroExtrasBound {
        /// `extras.max_name_len` or `extras.max_value_len`.
        field: &'static str,
    },

    /// `logging.level` is not a filter directive the subscriber accepts.
    #[error("invalid configuration value for logging.level: {reason}")]
    InvalidLogLevel {
        /// The rejected directive.
        level: String,
        /// Filter parser message.
        reason: String,
    },

    /// An environment override could not be converted.
    #[error("failed to parse environment variable {var}: expected {expected}")]
    InvalidEnvOverride {
        /// The environment variable name.
        var: String,
        /// What the key accepts, e.g. `integer` or `'json' or 'pretty'`.
        expected: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub(crate) fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn env_override(var: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidEnvOverride {
            var: var.into(),
            expected,
        }
    }

    /// Returns the dotted config key or environment variable at fault, when
    /// the error concerns a single setting.
    #[must_use]
    pub fn setting(&self) -> Option<&str> {
        match self {
            Self::ZeroExtrasBound { field } => Some(*field),
            Self::InvalidLogLevel { .. } => Some("logging.level"),
            Self::InvalidEnvOverride { var, .. } => Some(var.as_str()),
            _ => None,
        }
    }
}
