/// Error handling shared by every HTTP-facing component of noughts_web
///
/// This module provides:
/// - The standard `{"error","message","details"}` response body
/// - The `IntoErrorResponse` trait mapping domain errors to status codes
/// - Conversion of unmatched warp rejections into the same body
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::{Rejection, Reply};

/// Standard error response format for all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "match_not_found")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (structured data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    /// Convert to HTTP response with specified status code
    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Client errors (4xx) - expected, normal operation
    Client,
    /// Server errors (5xx) - unexpected, needs investigation
    Server,
    /// Critical errors - shared state is no longer trustworthy
    Critical,
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    /// Machine-readable code placed in the `error` field
    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        if let Some(details) = self.error_details() {
            ErrorResponse::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorResponse::new(self.error_code(), self.error_message())
        }
    }

    /// Convert to HTTP response, logging at a level matching the severity
    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let error_response = self.to_error_response();

        match self.severity() {
            ErrorSeverity::Client => tracing::info!(
                status = status.as_u16(),
                error = %error_response.error,
                "client error: {}",
                error_response.message
            ),
            ErrorSeverity::Server => tracing::error!(
                status = status.as_u16(),
                error = %error_response.error,
                "server error: {}",
                error_response.message
            ),
            ErrorSeverity::Critical => tracing::error!(
                status = status.as_u16(),
                error = %error_response.error,
                critical = true,
                "critical error: {}",
                error_response.message
            ),
        }

        error_response.into_response(status)
    }
}

/// Renders rejections that no route handled (unknown path, bad body, wrong
/// method) with the standard error body.
pub async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    Ok(rejection_response(&rejection))
}

pub fn rejection_response(rejection: &Rejection) -> Response {
    let (status, body) = if rejection.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("not_found", "No route matches the request"),
        )
    } else if let Some(err) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("invalid_body", err.to_string()),
        )
    } else if let Some(err) = rejection.find::<warp::reject::InvalidQuery>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("invalid_query", err.to_string()),
        )
    } else if rejection.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorResponse::new("unsupported_media_type", "Expected an application/json body"),
        )
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new("method_not_allowed", "Method not allowed for this path"),
        )
    } else {
        tracing::error!(rejection = ?rejection, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("internal_error", "Unhandled request rejection"),
        )
    };
    body.into_response(status)
}
