//! Classifier error types.

use thiserror::Error;

/// Errors that can occur during classification.
///
/// None of these escape the pipeline: every failure path degrades to the
/// deterministic fallback classification at the call site.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Missing or invalid configuration (API key, URL, etc.)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network or API error from the model provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider returned text that could not be parsed into a
    /// well-formed classification.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
