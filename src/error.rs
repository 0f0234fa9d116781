//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Upstream failures are logged here, once, when they become a response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "no price data for 2025-01-01",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`GatewayError`] for the ranges).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                   |
/// |-----------|-----------------|-------------------------------|
/// | 1000–1999 | Validation/Auth | 400 Bad Request / 401         |
/// | 2000–2999 | Not Found       | 404 Not Found                 |
/// | 3000–3999 | Server          | 500 Internal Server Error     |
/// | 4000–4999 | Upstream        | 502 Bad Gateway               |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No session was presented.
    #[error("authentication required")]
    Unauthorized,

    /// Request could not be parsed or is structurally invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Input failed a business validation rule; nothing was sent upstream.
    #[error("{0}")]
    Validation(String),

    /// Unknown dashboard series name.
    #[error("unknown series: {0}")]
    UnknownSeries(String),

    /// Profile row for the given user was not found.
    #[error("profile not found: {0}")]
    ProfileNotFound(uuid::Uuid),

    /// Upstream API unreachable or returned an unreadable body.
    #[error("upstream {service} error: {message}")]
    Upstream {
        /// Upstream service name (`pricing` or `billing`).
        service: &'static str,
        /// Failure description.
        message: String,
    },

    /// Upstream API answered with a non-success status.
    #[error("upstream {service} returned HTTP {status}")]
    UpstreamStatus {
        /// Upstream service name (`pricing` or `billing`).
        service: &'static str,
        /// HTTP status code returned upstream.
        status: u16,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Validation(_) => 1002,
            Self::UnknownSeries(_) => 1003,
            Self::Unauthorized => 1004,
            Self::ProfileNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::Upstream { .. } => 4001,
            Self::UpstreamStatus { .. } => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Validation(_) | Self::UnknownSeries(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ProfileNotFound(_) => StatusCode::NOT_FOUND,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { .. } | Self::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Returns `true` for failures of an upstream API.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::UpstreamStatus { .. })
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
