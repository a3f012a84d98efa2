use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Failed to send notification")]
    Delivery,

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingFields => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Delivery | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let AppError::Internal(source) = &self {
            // Log the cause, the response body only carries the generic message.
            error!(%source, "unhandled error");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
