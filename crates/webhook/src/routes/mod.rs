//! Route handlers for the webhook server.

pub mod health;
pub mod twilio;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/webhooks/twilio",
            post(twilio::inbound).get(twilio::verify),
        )
        .route("/health", get(health::health))
}
