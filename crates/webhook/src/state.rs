//! Application state shared across handlers.

use std::sync::Arc;

use pipeline::MessagePipeline;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The inbound message pipeline.
    pub pipeline: Arc<MessagePipeline>,
}

impl AppState {
    /// Create new application state.
    pub fn new(pipeline: Arc<MessagePipeline>) -> Self {
        Self { pipeline }
    }
}
