//! Core trait and types for message classification.
//!
//! This crate provides the shared interface for classifier implementations
//! in the Conserje pipeline. It defines:
//!
//! - [`Classifier`] - The trait that all classifier implementations must implement
//! - [`ClassifyRequest`] / [`Classification`] - Input and structured output
//! - [`ClassifierError`] - Error types for classifier operations
//! - [`parse_classification`] - Defensive parsing of raw model output
//! - [`build_prompt`] / [`CLASSIFIER_SYSTEM_PROMPT`] - Prompt construction
//!
//! # Example
//!
//! ```rust
//! use classifier_core::{
//!     async_trait, Classification, Classifier, ClassifierError, ClassifyRequest,
//! };
//!
//! struct AlwaysFallback;
//!
//! #[async_trait]
//! impl Classifier for AlwaysFallback {
//!     async fn classify(
//!         &self,
//!         request: ClassifyRequest,
//!     ) -> Result<Classification, ClassifierError> {
//!         Ok(Classification::fallback(&request.language))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "AlwaysFallback"
//!     }
//! }
//! ```

mod error;
mod parse;
mod prompt;
mod trait_def;
mod types;

pub use error::ClassifierError;
pub use parse::{extract_json, parse_classification};
pub use prompt::{build_prompt, CLASSIFIER_SYSTEM_PROMPT};
pub use trait_def::Classifier;
pub use types::{
    Classification, ClassifyRequest, Intent, KnowledgeFact, Priority, RouteTo, SenderRole,
};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
