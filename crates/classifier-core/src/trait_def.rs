//! The classifier trait.

use async_trait::async_trait;

use crate::error::ClassifierError;
use crate::types::{Classification, ClassifyRequest};

/// Trait for intent classifier implementations.
///
/// Implementations call a model provider; callers are expected to convert
/// any error into [`Classification::fallback`] rather than propagating it.
///
/// [`Classification::fallback`]: crate::types::Classification::fallback
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one inbound message.
    async fn classify(&self, request: ClassifyRequest) -> Result<Classification, ClassifierError>;

    /// Name of this classifier implementation, for logging.
    fn name(&self) -> &str;
}
