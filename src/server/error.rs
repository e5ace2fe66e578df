//! Server Error Types
//!
//! Defines error types for the shell server and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::navigation::NavigationError;
use crate::routes::RouteError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Route resolution failed
    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    /// Loading or rendering the matched view failed
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Only GET and HEAD reach the shell
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Embedding route state failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

fn route_status(err: &RouteError) -> (StatusCode, &'static str) {
    match err {
        RouteError::UnknownRoute(_) | RouteError::NoMatch(_) => {
            (StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND")
        }
        RouteError::MissingParam { .. } => (StatusCode::BAD_REQUEST, "MISSING_PARAM"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "ROUTE_TABLE_ERROR"),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::Route(e) => route_status(e),
            ServerError::Navigation(NavigationError::Route(e)) => route_status(e),
            ServerError::Navigation(NavigationError::View(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "VIEW_ERROR")
            }
            ServerError::Navigation(_) => (StatusCode::CONFLICT, "NAVIGATION_ERROR"),
            ServerError::MethodNotAllowed(_) => {
                (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED")
            }
            ServerError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
            }
            ServerError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Server error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for server handlers
pub type ServerResult<T> = Result<T, ServerError>;
