//! Delayed classifier - wraps another classifier with artificial delay.

use std::time::Duration;

use classifier_core::{
    async_trait, Classification, Classifier, ClassifierError, ClassifyRequest,
};
use tokio::time::sleep;

/// A classifier that wraps another classifier and adds artificial delay.
///
/// Useful for testing timeout handling.
pub struct DelayedClassifier<C: Classifier> {
    inner: C,
    delay: Duration,
}

impl<C: Classifier> DelayedClassifier<C> {
    /// Create a new DelayedClassifier wrapping the given classifier.
    pub fn new(inner: C, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a classifier with a delay in milliseconds.
    pub fn with_millis(inner: C, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<C: Classifier> Classifier for DelayedClassifier<C> {
    async fn classify(&self, request: ClassifyRequest) -> Result<Classification, ClassifierError> {
        sleep(self.delay).await;
        self.inner.classify(request).await
    }

    fn name(&self) -> &str {
        "DelayedClassifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CannedClassifier;
    use classifier_core::SenderRole;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_classifier() {
        let classifier = DelayedClassifier::with_millis(CannedClassifier::fallback("es"), 100);

        let start = Instant::now();
        let result = classifier
            .classify(ClassifyRequest {
                text: "hola".to_string(),
                sender_role: SenderRole::Renter,
                language: "es".to_string(),
                building_name: "Torre del Mar".to_string(),
                knowledge: vec![],
            })
            .await
            .unwrap();
        let elapsed = start.elapsed();

        assert!(result.requires_human_review);
        assert!(elapsed >= Duration::from_millis(100));
    }
}
