//! Error types for the XSOAR client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! API failures (any status >= 400) are mapped by [`Error::from_response`]
//! into typed variants that all carry the same [`ApiError`] payload, so callers
//! can either match on the precise kind or inspect the shared fields through
//! [`Error::api_error`].

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Fields shared by every error returned from the XSOAR API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code
    #[serde(default)]
    pub status: u16,
    /// Error message from the server (or the raw body when not JSON)
    #[serde(default)]
    pub message: String,
    /// Request ID from the `X-Request-ID` header or the error body
    #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Additional detail from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    /// Create an API error with a status and message
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            request_id: None,
            detail: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.request_id {
            Some(id) => write!(
                f,
                "API error {}: {} (request_id={id})",
                self.status, self.message
            ),
            None => write!(f, "API error {}: {}", self.status, self.message),
        }
    }
}

/// The main error type for the XSOAR client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("no base URL configured")]
    NoBaseUrl,

    #[error("no credentials configured")]
    NoCredentials,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // API Errors (status >= 400)
    // ============================================================================
    #[error("authentication failed: {}", .0.message)]
    Authentication(ApiError),

    #[error("{}", not_found_message(.api, .resource_type.as_deref(), .resource_id.as_deref()))]
    NotFound {
        api: ApiError,
        resource_type: Option<String>,
        resource_id: Option<String>,
    },

    #[error("{}", validation_message(.api, .fields))]
    Validation {
        api: ApiError,
        fields: BTreeMap<String, String>,
    },

    #[error("{}", rate_limit_message(.retry_after))]
    RateLimited {
        api: ApiError,
        retry_after: Option<Duration>,
    },

    #[error("server error {}: {}", .0.status, .0.message)]
    Server(ApiError),

    #[error("{0}")]
    Api(ApiError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response too large: exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Iteration Errors
    // ============================================================================
    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("iterator is empty")]
    EmptyIterator,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn not_found_message(api: &ApiError, kind: Option<&str>, id: Option<&str>) -> String {
    match (kind, id) {
        (Some(kind), Some(id)) => format!("{kind} not found: {id}"),
        _ => format!("resource not found: {}", api.message),
    }
}

fn validation_message(api: &ApiError, fields: &BTreeMap<String, String>) -> String {
    if fields.is_empty() {
        return format!("validation error: {}", api.message);
    }
    let fields = fields
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("validation error: {} (fields: {fields})", api.message)
}

fn rate_limit_message(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) if !d.is_zero() => format!("rate limit exceeded, retry after {}s", d.as_secs()),
        _ => "rate limit exceeded".to_string(),
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a client-side validation error (no status code)
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            api: ApiError::new(0, message),
            fields: BTreeMap::new(),
        }
    }

    /// Create a not-found error for a specific resource
    pub fn not_found(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        Self::NotFound {
            api: ApiError::new(404, format!("{resource_type} not found")),
            resource_type: Some(resource_type),
            resource_id: Some(resource_id.into()),
        }
    }

    /// Map an HTTP error response onto the error taxonomy
    pub fn from_response(status: u16, body: &[u8], headers: &HeaderMap) -> Self {
        let mut api = serde_json::from_slice::<ApiError>(body).unwrap_or_else(|_| ApiError {
            message: String::from_utf8_lossy(body).into_owned(),
            ..ApiError::default()
        });
        api.status = status;
        if let Some(id) = header_str(headers, "x-request-id") {
            api.request_id = Some(id.to_string());
        }

        match status {
            401 | 403 => Self::Authentication(api),
            404 => Self::NotFound {
                api,
                resource_type: None,
                resource_id: None,
            },
            400 => Self::Validation {
                api,
                fields: parse_fields(body),
            },
            429 => Self::RateLimited {
                api,
                retry_after: header_str(headers, "retry-after").and_then(parse_retry_after),
            },
            s if s >= 500 => Self::Server(api),
            _ => Self::Api(api),
        }
    }

    /// The shared API payload, for any variant produced from a response
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Authentication(api) | Self::Server(api) | Self::Api(api) => Some(api),
            Self::NotFound { api, .. }
            | Self::Validation { api, .. }
            | Self::RateLimited { api, .. } => Some(api),
            _ => None,
        }
    }

    /// HTTP status of an API error, if any
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|api| api.status).filter(|s| *s != 0)
    }

    /// Check if this error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was raised by a cancellation or an expired deadline
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
}

/// Best-effort parse of field-level validation errors
fn parse_fields(body: &[u8]) -> BTreeMap<String, String> {
    #[derive(Deserialize)]
    struct FieldData {
        #[serde(default)]
        fields: BTreeMap<String, String>,
    }

    serde_json::from_slice::<FieldData>(body)
        .map(|data| data.fields)
        .unwrap_or_default()
}

/// Parse a `Retry-After` header given either as seconds or as an HTTP date
pub(crate) fn parse_retry_after(value: &str) -> Option<Duration> {
    if let Ok(seconds) = value.trim().parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let at = DateTime::parse_from_rfc2822(value.trim()).ok()?;
    (at.with_timezone(&Utc) - Utc::now())
        .to_std()
        .ok()
        .filter(|d| !d.is_zero())
}

/// Result type alias for the XSOAR client
pub type Result<T> = std::result::Result<T, Error>;
