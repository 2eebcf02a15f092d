//! Logging setup for services embedding querybind.
//!
//! The binder itself only emits [`tracing`] events. This crate wires those
//! events into a subscriber:
//!
//! - chain trips are logged at `debug` with the parameter and error
//! - absorbed soft failures (malformed numbers, bad base64) at `trace`
//! - dropped oversized extras at `debug`, with lengths only, never values
//!
//! # Example
//!
//! ```rust,ignore
//! use querybind_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

#[doc(hidden)]
pub use tracing;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
