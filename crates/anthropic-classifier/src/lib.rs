//! Anthropic-backed implementation of the `Classifier` trait.
//!
//! Calls the Anthropic Messages API with a fixed system prompt and parses
//! the JSON-only response into a [`Classification`]. Configure via
//! environment variables (see [`AnthropicConfig::from_env`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use anthropic_classifier::AnthropicClassifier;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = AnthropicClassifier::from_env()?;
//! # Ok(())
//! # }
//! ```

mod api_types;
mod classifier;
mod config;

pub use classifier::AnthropicClassifier;
pub use config::AnthropicConfig;

// Re-export core types for convenience
pub use classifier_core::{Classification, Classifier, ClassifierError, ClassifyRequest};
