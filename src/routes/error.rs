use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::services::upload::UploadError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid multipart upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Missing form field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("No verification found for this form")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Multipart(e) => e.status(),
            ApiError::MissingField(_) | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload(UploadError::TooLarge(_)) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upload(UploadError::UnsupportedMediaType) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
