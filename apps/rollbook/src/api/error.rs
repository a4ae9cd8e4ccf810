//! # API Error Mapping
//!
//! The one place record errors become HTTP responses. Every failure is
//! rendered as `{"error": "<message>"}`.

use super::types::ErrorResponse;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rollbook_core::RecordError;
use thiserror::Error;

/// Errors returned by API handlers and middleware.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Too Many Requests")]
    RateLimited,

    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Record(RecordError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Record(RecordError::DuplicateKey(_)) => StatusCode::CONFLICT,
            Self::Record(RecordError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Record(RecordError::Storage(_) | RecordError::Serialization(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Record(RecordError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::Record(RecordError::InvalidInput(
            "roll must be a non-negative integer".to_string(),
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(event = "request_failed", error = %self, "Internal error");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_core::Roll;

    #[test]
    fn record_errors_map_to_statuses() {
        let cases = [
            (RecordError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (RecordError::DuplicateKey(Roll(1)), StatusCode::CONFLICT),
            (RecordError::NotFound(Roll(1)), StatusCode::NOT_FOUND),
            (RecordError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (RecordError::Serialization("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn middleware_errors_map_to_statuses() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn routing_errors_map_to_statuses() {
        let missing = ApiError::RouteNotFound("/nope".into());
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "No route for /nope");

        let wrong_method = ApiError::MethodNotAllowed {
            method: "POST".into(),
            path: "/api/students/count".into(),
        };
        assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
