use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use thiserror::Error;
use tracing::error;

/// Errors produced by the progress core
///
/// There are exactly two failure classes: the caller passed something that
/// can never succeed, or the storage layer could not complete the request.
#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] anyhow::Error),
}

impl ProgressError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ProgressError::InvalidArgument(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(anyhow::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid quality: {0}")]
    InvalidQuality(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            ProgressError::StorageUnavailable(err) => ApiError::StorageUnavailable(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::StorageUnavailable(err) => {
                error!("Storage unavailable: {:#}", err);
                (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable".to_string())
            }
            ApiError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidQuality(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
