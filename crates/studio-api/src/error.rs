//! Mapping studio errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use studio_core::Error;

/// Body sent when something fails on our side.
pub const INTERNAL_MESSAGE: &str = "Something went wrong. Please try again later.";

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Short description, always present.
    pub error: String,
    /// Longer, user-facing explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// A body with only `error` set.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

/// An error returned from a handler.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// The status code for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Upstream { .. } | Error::StreamInterrupted(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::invalid_input(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            Error::InvalidInput(msg) | Error::NotFound(msg) | Error::Conflict(msg) => {
                ErrorBody::new(msg.clone())
            }
            Error::Upstream { .. } | Error::StreamInterrupted(_) => {
                tracing::warn!(error = %self.0, "Upstream failure");
                ErrorBody::new(self.0.to_string())
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                ErrorBody::new(INTERNAL_MESSAGE)
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Handler result.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
