//! Error types for the webhook server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors surfaced as HTTP responses.
///
/// Only validation failures become client errors; the Twilio handler maps
/// everything else to a 200 acknowledgment itself (see routes::twilio).
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing or malformed webhook fields.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let WebhookError::BadRequest(message) = self;

        let body = serde_json::json!({
            "error": message
        });

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
