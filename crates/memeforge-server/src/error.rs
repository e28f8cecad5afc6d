use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use memeforge_shared::ValidationError;

/// Errors surfaced by the HTTP handlers.
///
/// Every variant maps to one of the wire error shapes: `{message}` for client
/// errors, `{message, errors}` for validation failures, `{message, error}`
/// for internal failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("No image file provided")]
    MissingImage,

    #[error("Only image files are allowed")]
    NotAnImage,

    #[error("Image too large: {size} bytes (max {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Failed to deploy meme coin: {0}")]
    DeployFailed(String),

    #[error("Failed to fetch meme coins: {0}")]
    QueryFailed(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::MissingImage | ServerError::NotAnImage | ServerError::Multipart(_) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "message": self.to_string() }),
            ),
            ServerError::ImageTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                serde_json::json!({ "message": self.to_string() }),
            ),
            ServerError::InvalidInput(detail) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "message": "Invalid input data",
                    "errors": detail.to_string(),
                }),
            ),
            ServerError::DeployFailed(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "message": "Failed to deploy meme coin",
                    "error": detail,
                }),
            ),
            ServerError::QueryFailed(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "message": "Failed to fetch meme coins",
                    "error": detail,
                }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
