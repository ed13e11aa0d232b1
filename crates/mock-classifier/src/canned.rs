//! Canned classifier - always returns a fixed classification.

use classifier_core::{
    async_trait, Classification, Classifier, ClassifierError, ClassifyRequest,
};

/// A classifier that returns the same classification for every message.
///
/// The workhorse double for pipeline tests: construct it with exactly the
/// classification a scenario needs.
#[derive(Debug, Clone)]
pub struct CannedClassifier {
    classification: Classification,
}

impl CannedClassifier {
    /// Create a classifier that always returns the given classification.
    pub fn new(classification: Classification) -> Self {
        Self { classification }
    }

    /// Create a classifier that returns the deterministic fallback.
    pub fn fallback(language: &str) -> Self {
        Self::new(Classification::fallback(language))
    }
}

#[async_trait]
impl Classifier for CannedClassifier {
    async fn classify(&self, _request: ClassifyRequest) -> Result<Classification, ClassifierError> {
        Ok(self.classification.clone())
    }

    fn name(&self) -> &str {
        "CannedClassifier"
    }
}
