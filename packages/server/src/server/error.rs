//! Request errors rendered as `{ "error": message }`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lot_scout::ScoutError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request can never succeed as sent
    #[error("{0}")]
    BadRequest(String),

    /// Something failed on our side
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<ScoutError>,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Map a library error, using `message` when it is not the caller's fault.
    pub fn from_scout(err: ScoutError, message: &str) -> Self {
        match err {
            ScoutError::UnsupportedSource { .. } => Self::bad_request("Unsupported auction site"),
            e if e.is_client_error() => Self::BadRequest(e.to_string()),
            e => Self::Internal {
                message: message.to_string(),
                source: Some(e),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { source, .. } = &self {
            tracing::error!(error = %self, source = ?source, "Request failed");
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
