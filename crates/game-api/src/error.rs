//! API errors and their HTTP mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use game_service::ServiceError;
use serde_json::json;
use tower::timeout::error::Elapsed;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Unhandled middleware error: {0}")]
    Middleware(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    /// Not-found is reported as 400, like every other client error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::Internal(_)) | ApiError::Middleware(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Service(ServiceError::InvalidArgument(_))
            | ApiError::Service(ServiceError::NotFound(_))
            | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Turns errors raised by the router's tower layers into JSON responses
pub async fn handle_layer_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Middleware(err.to_string())
    }
}
