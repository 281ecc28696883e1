//! Error types for ZIA operations.
//!
//! HTTP failures are classified exactly once, when the dispatcher sees a
//! non-success response, into tagged variants. Callers (and the conflict retry
//! wrapper) match on those variants instead of re-parsing message strings.

use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Literal marker the upstream places in the body of an edit-lock failure.
pub const EDIT_LOCK_MARKER: &str = r#""code":"EDIT_LOCK_NOT_AVAILABLE""#;

/// Error code reported for edit-lock failures.
pub const EDIT_LOCK_CODE: &str = "EDIT_LOCK_NOT_AVAILABLE";

/// Main error type for ZIA operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Another admin holds the edit lock; the only retryable failure.
    #[error("Edit lock not available: {0}")]
    Conflict(ApiError),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(ApiError),

    /// Credentials rejected (401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(ApiError),

    /// Request rejected as malformed (400)
    #[error("Bad request: {0}")]
    BadRequest(ApiError),

    /// Upstream overloaded or failing (429 and 5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(ApiError),

    /// Any other non-success status
    #[error("HTTP error: {0}")]
    Status(ApiError),

    /// A successful response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request timed out at the transport
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection or I/O failure before a status was received
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Endpoint path could not be joined onto the base URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request rejected locally before being sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The credential source could not produce a token
    #[error("Credential error: {0}")]
    Credential(String),

    /// A paginated fetch exceeded its configured page cap
    #[error("Pagination of `{endpoint}` exceeded {max_pages} pages")]
    PageLimitExceeded {
        /// Endpoint being paginated
        endpoint: String,
        /// Configured cap
        max_pages: u32,
    },
}

/// Specialized result type for ZIA operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Status code and server-provided details of a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Server error code (`code` field of the error envelope), if any
    pub code: Option<String>,
    /// Server message, or the raw body when it is not an error envelope
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    code: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Build from a status and raw response body.
    ///
    /// The body is read as a `{ "code": ..., "message": ... }` envelope when
    /// possible; otherwise the raw text becomes the message.
    #[must_use]
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) if envelope.code.is_some() || envelope.message.is_some() => Self {
                status,
                code: envelope.code,
                message: envelope.message.unwrap_or_else(|| body.to_string()),
            },
            _ => Self {
                status,
                code: None,
                message: body.to_string(),
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} {code}: {}", self.status, self.message),
            None => write!(f, "{}: {}", self.status, self.message),
        }
    }
}

/// Classify a non-success response.
///
/// A body carrying [`EDIT_LOCK_MARKER`] is a [`Error::Conflict`] regardless of
/// status; everything else is classified by status code.
#[must_use]
pub fn map_status_to_error(status: StatusCode, body: &str) -> Error {
    let api = ApiError::from_body(status.as_u16(), body);

    if body.contains(EDIT_LOCK_MARKER) {
        return Error::Conflict(ApiError {
            code: Some(EDIT_LOCK_CODE.to_string()),
            ..api
        });
    }

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(api),
        StatusCode::BAD_REQUEST => Error::BadRequest(api),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(api),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => Error::ServiceUnavailable(api),
        status if status.is_server_error() => Error::ServiceUnavailable(api),
        _ => Error::Status(api),
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => EDIT_LOCK_CODE,
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Status(_) => "HTTP_STATUS",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Http(_) => "HTTP_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Credential(_) => "CREDENTIAL_ERROR",
            Self::PageLimitExceeded { .. } => "PAGE_LIMIT_EXCEEDED",
        }
    }

    /// Status and server details, for errors produced from a response.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Conflict(api)
            | Self::NotFound(api)
            | Self::Unauthorized(api)
            | Self::BadRequest(api)
            | Self::ServiceUnavailable(api)
            | Self::Status(api) => Some(api),
            _ => None,
        }
    }

    /// HTTP status code, for errors produced from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|api| api.status)
    }

    /// Returns true for the transient edit-lock failure.
    #[must_use]
    pub const fn is_edit_lock_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Returns true for a 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::Credential(_) | Self::ServiceUnavailable(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_lock_body_maps_to_conflict() {
        let body = r#"{"code":"EDIT_LOCK_NOT_AVAILABLE","message":"Failed during enter Org barrier"}"#;
        let err = map_status_to_error(StatusCode::CONFLICT, body);

        assert!(err.is_edit_lock_conflict());
        let api = err.api_error().unwrap();
        assert_eq!(api.status, 409);
        assert_eq!(api.code.as_deref(), Some(EDIT_LOCK_CODE));
        assert_eq!(api.message, "Failed during enter Org barrier");
    }

    #[test]
    fn test_edit_lock_marker_wins_over_status() {
        let body = r#"error: {"code":"EDIT_LOCK_NOT_AVAILABLE"}"#;
        let err = map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert!(err.is_edit_lock_conflict());
        assert_eq!(err.api_error().unwrap().message, body);
    }

    #[test]
    fn test_plain_409_is_not_retryable() {
        let body = r#"{"code":"DUPLICATE_ITEM","message":"already exists"}"#;
        let err = map_status_to_error(StatusCode::CONFLICT, body);
        assert!(!err.is_edit_lock_conflict());
        assert!(matches!(err, Error::Status(_)));
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_marker_requires_exact_literal() {
        let body = r#"{"code": "EDIT_LOCK_NOT_AVAILABLE"}"#;
        let err = map_status_to_error(StatusCode::CONFLICT, body);
        assert!(!err.is_edit_lock_conflict());
    }

    #[test]
    fn test_status_classification() {
        assert!(map_status_to_error(StatusCode::NOT_FOUND, "missing").is_not_found());
        assert!(matches!(
            map_status_to_error(StatusCode::BAD_REQUEST, "bad"),
            Error::BadRequest(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::UNAUTHORIZED, ""),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::FORBIDDEN, ""),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::TOO_MANY_REQUESTS, ""),
            Error::ServiceUnavailable(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, ""),
            Error::ServiceUnavailable(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::IM_A_TEAPOT, ""),
            Error::Status(_)
        ));
    }

    #[test]
    fn test_api_error_from_plain_body() {
        let api = ApiError::from_body(404, "not here");
        assert_eq!(api.code, None);
        assert_eq!(api.message, "not here");
        assert_eq!(api.to_string(), "404: not here");
    }

    #[test]
    fn test_api_error_from_envelope() {
        let api = ApiError::from_body(400, r#"{"code":"INVALID_INPUT_ARGUMENT","message":"bad name"}"#);
        assert_eq!(api.code.as_deref(), Some("INVALID_INPUT_ARGUMENT"));
        assert_eq!(api.to_string(), "400 INVALID_INPUT_ARGUMENT: bad name");
    }

    #[test]
    fn test_api_error_non_envelope_json() {
        let api = ApiError::from_body(500, "[1,2]");
        assert_eq!(api.code, None);
        assert_eq!(api.message, "[1,2]");
    }

    #[test]
    fn test_error_codes() {
        let api = ApiError::from_body(404, "");
        assert_eq!(Error::NotFound(api.clone()).error_code(), "NOT_FOUND");
        assert_eq!(Error::Conflict(api.clone()).error_code(), EDIT_LOCK_CODE);
        assert_eq!(Error::Status(api).error_code(), "HTTP_STATUS");
        assert_eq!(Error::Decode("x".into()).error_code(), "DECODE_ERROR");
        assert_eq!(Error::Timeout("x".into()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::PageLimitExceeded {
                endpoint: "/departments".into(),
                max_pages: 3
            }
            .error_code(),
            "PAGE_LIMIT_EXCEEDED"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound(ApiError::from_body(404, "rule 7"));
        assert_eq!(err.to_string(), "Not found: 404: rule 7");

        let err = Error::PageLimitExceeded {
            endpoint: "/users".into(),
            max_pages: 2,
        };
        assert_eq!(err.to_string(), "Pagination of `/users` exceeded 2 pages");
    }

    #[test]
    fn test_decode_errors_carry_no_status() {
        let err = Error::Decode("expected array".into());
        assert_eq!(err.status(), None);
        assert!(!err.is_edit_lock_conflict());
    }

    #[test]
    fn test_should_log() {
        assert!(Error::ConfigError("test".to_string()).should_log());
        assert!(Error::Credential("test".to_string()).should_log());
        assert!(!Error::NotFound(ApiError::from_body(404, "")).should_log());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let zia_err: Error = err.into();
        assert!(matches!(zia_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let zia_err: Error = err.into();
        assert!(matches!(zia_err, Error::Decode(_)));
    }
}
