//! Chain error types.
//!
//! [`BindError`] is the default error tracked by a [`Binder`](crate::Binder).
//! A binder stores at most one error per chain; the first one wins.

use http::StatusCode;
use std::fmt;

/// Message used when the batch integer extractor receives name and default
/// lists of different lengths.
pub const SIZE_MISMATCH_MESSAGE: &str = "non-matching size for int params";

/// Error that terminates a binding chain.
///
/// Carries a category, the parameter it relates to (when there is one) and
/// a human readable message. It maps onto an HTTP status code so hosts can
/// turn a failed bind into a response without inspecting the message.
///
/// # Example
///
/// ```rust
/// use querybind::BindError;
/// use http::StatusCode;
///
/// let err = BindError::invalid("limit", "must be positive");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.field(), Some("limit"));
/// assert!(err.to_string().contains("must be positive"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    kind: BindErrorKind,
    field: Option<String>,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindErrorKind {
    /// Batch extractor called with mismatched argument lists
    SizeMismatch,
    /// Caller rejected a parameter value
    Invalid,
    /// Caller rejected the populated record
    ValidationFailed,
    /// Raw query text could not be decoded
    MalformedQuery,
    /// Anything else reported by a caller closure
    Custom,
}

impl BindError {
    /// Creates the configuration error raised by the batch integer
    /// extractor when `names.len() != defaults.len()`.
    ///
    /// The message is always [`SIZE_MISMATCH_MESSAGE`]; the lengths are only
    /// kept for logging.
    #[must_use]
    pub fn size_mismatch(names: usize, defaults: usize) -> Self {
        tracing::debug!(names, defaults, "batch extractor argument lengths differ");
        Self {
            kind: BindErrorKind::SizeMismatch,
            field: None,
            message: SIZE_MISMATCH_MESSAGE.to_string(),
        }
    }

    /// Creates an error for a parameter whose value the caller rejected.
    #[must_use]
    pub fn invalid(field: impl Into<String>, details: impl Into<String>) -> Self {
        let field = field.into();
        let details = details.into();
        Self {
            kind: BindErrorKind::Invalid,
            message: format!("invalid query parameter '{field}': {details}"),
            field: Some(field),
        }
    }

    /// Creates an error for a record that failed whole-record validation.
    #[must_use]
    pub fn validation_failed(details: impl Into<String>) -> Self {
        Self {
            kind: BindErrorKind::ValidationFailed,
            field: None,
            message: details.into(),
        }
    }

    /// Creates an error for query text that is not valid
    /// `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn malformed_query(details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            kind: BindErrorKind::MalformedQuery,
            field: None,
            message: format!("malformed query string: {details}"),
        }
    }

    /// Creates a custom error.
    ///
    /// The message is kept verbatim.
    #[must_use]
    pub fn custom(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: BindErrorKind::Custom,
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Returns the parameter name if applicable.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if this is the batch size mismatch error.
    #[must_use]
    pub fn is_size_mismatch(&self) -> bool {
        self.kind == BindErrorKind::SizeMismatch
    }

    /// Returns the appropriate HTTP status code for this error.
    ///
    /// A size mismatch is a bug in the calling code, not in the request, so
    /// it maps to a server error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            BindErrorKind::SizeMismatch => StatusCode::INTERNAL_SERVER_ERROR,
            BindErrorKind::Invalid => StatusCode::BAD_REQUEST,
            BindErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            BindErrorKind::MalformedQuery => StatusCode::BAD_REQUEST,
            BindErrorKind::Custom => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            BindErrorKind::SizeMismatch => "PARAM_SIZE_MISMATCH",
            BindErrorKind::Invalid => "INVALID_PARAMETER",
            BindErrorKind::ValidationFailed => "VALIDATION_FAILED",
            BindErrorKind::MalformedQuery => "MALFORMED_QUERY",
            BindErrorKind::Custom => "BIND_FAILED",
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BindError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_error() {
        let err = BindError::size_mismatch(2, 3);

        assert!(err.is_size_mismatch());
        assert_eq!(err.to_string(), "non-matching size for int params");
        assert_eq!(err.field(), None);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "PARAM_SIZE_MISMATCH");
    }

    #[test]
    fn test_invalid_error() {
        let err = BindError::invalid("limit", "must be positive");

        assert!(!err.is_size_mismatch());
        assert_eq!(err.field(), Some("limit"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.to_string().contains("limit"));
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_validation_failed_error() {
        let err = BindError::validation_failed("from must precede to");

        assert_eq!(err.field(), None);
        assert_eq!(err.message(), "from must precede to");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_malformed_query_error() {
        let err = BindError::malformed_query("invalid percent encoding");

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MALFORMED_QUERY");
        assert!(err.to_string().starts_with("malformed query string"));
    }

    #[test]
    fn test_custom_error_keeps_message_verbatim() {
        let err = BindError::custom("k", "there was an error");

        assert_eq!(err.to_string(), "there was an error");
        assert_eq!(err.field(), Some("k"));
        assert_eq!(err.error_code(), "BIND_FAILED");
    }
}
