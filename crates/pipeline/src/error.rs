use thiserror::Error;

use crate::normalizer::NormalizeError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed inbound addresses. The only error class the webhook
    /// surfaces as a client error; everything else is logged and acked.
    #[error("Validation error: {0}")]
    Validation(#[from] NormalizeError),

    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
