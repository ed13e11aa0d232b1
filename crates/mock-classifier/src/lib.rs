//! Mock classifier implementations for pipeline testing.
//!
//! This crate provides mock implementations of the `Classifier` trait:
//! - `CannedClassifier` - Always returns a fixed classification
//! - `FailingClassifier` - Always errors (exercises the fallback path)
//! - `DelayedClassifier` - Wraps another classifier with artificial delay
//!
//! For production classification, use the `anthropic-classifier` crate.

mod canned;
mod delayed;
mod failing;

// Re-export classifier-core types for convenience
pub use classifier_core::{
    async_trait, Classification, Classifier, ClassifierError, ClassifyRequest, Intent, Priority,
    RouteTo, SenderRole,
};

pub use canned::CannedClassifier;
pub use delayed::DelayedClassifier;
pub use failing::FailingClassifier;
