//! HTTP error type returned by every handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scout_common::UploadError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed message returned when the description upstream fails.
pub const DESCRIPTION_FAILED: &str = "Failed to fetch description.";
/// Fixed message returned when the classification upstream fails.
pub const CLASSIFICATION_FAILED: &str = "Failed to classify image.";

/// Errors surfaced to HTTP clients. Every variant renders as
/// `{"error": "<message>"}` with the matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    UnsupportedMedia(String),

    #[error("Upload exceeds the maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("{}", DESCRIPTION_FAILED)]
    DescriptionFailed,

    #[error("{}", CLASSIFICATION_FAILED)]
    ClassificationFailed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::DescriptionFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ClassificationFailed => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedType(_) => ApiError::UnsupportedMedia(err.to_string()),
            UploadError::Empty => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::debug!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
