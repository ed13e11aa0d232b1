//! Failing classifier - always errors.

use classifier_core::{
    async_trait, Classification, Classifier, ClassifierError, ClassifyRequest,
};

/// A classifier whose every call fails with a network error.
///
/// Used to exercise the pipeline's fallback path.
#[derive(Debug, Clone, Default)]
pub struct FailingClassifier;

impl FailingClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _request: ClassifyRequest) -> Result<Classification, ClassifierError> {
        Err(ClassifierError::Network(
            "mock classifier is unreachable".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "FailingClassifier"
    }
}
