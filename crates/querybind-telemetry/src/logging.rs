//! Structured logging for querybind hosts.
//!
//! Installs a `tracing-subscriber` formatter that renders the binder's
//! events as JSON (production) or pretty text (development).
//!
//! # Example
//!
//! ```rust,ignore
//! use querybind_telemetry::logging::{LogConfig, init_logging};
//!
//! let config = LogConfig::default();
//! init_logging(&config)?;
//!
//! tracing::info!(request_id = "r-1", "binding search filter");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Log filter directive (e.g., "info", "querybind=trace").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span events (enter, exit, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name attached to startup events.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "querybind".to_string(),
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    ///
    /// The binder's own target is raised to `trace` so absorbed fallbacks
    /// are visible.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug,querybind=trace".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: "querybind".to_string(),
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "querybind".to_string(),
        }
    }
}

/// Initializes the logging subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidConfig` if the level does not parse as a
/// filter, or `TelemetryError::LoggingInit` if a global subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::debug!(service.name = %config.service_name, "logging initialized");
    Ok(())
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidConfig` if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::InvalidConfig(format!("invalid log level '{filter}': {e}")))
}

/// Field names carried by querybind events.
///
/// The binder's events and [`log_bind_failure!`](crate::log_bind_failure)
/// use exactly these keys. Use them when writing log queries.
pub mod fields {
    /// Parameter name field.
    pub const PARAM: &str = "param";

    /// Error display field.
    pub const ERROR: &str = "error";

    /// Number of claimed parameters at the end of a chain.
    pub const CLAIMED: &str = "claimed";

    /// Byte length of a dropped extras name.
    pub const NAME_LEN: &str = "name_len";

    /// Byte length of a dropped extras value.
    pub const VALUE_LEN: &str = "value_len";

    /// Error code field, as returned by `BindError::error_code`.
    pub const ERROR_CODE: &str = "error_code";

    /// Request ID field name.
    pub const REQUEST_ID: &str = "request_id";
}

/// Logs a rejected binding at `warn`.
///
/// Expects a `querybind::BindError` (or anything with `error_code()` and
/// `Display`).
#[macro_export]
macro_rules! log_bind_failure {
    ($request_id:expr, $error:expr) => {
        $crate::tracing::warn!(
            request_id = %$request_id,
            error_code = $error.error_code(),
            error = %$error,
            "Query binding rejected"
        );
    };
}
