//! AnthropicClassifier implementation using the Messages API.

use classifier_core::{
    async_trait, build_prompt, parse_classification, Classification, Classifier, ClassifierError,
    ClassifyRequest, CLASSIFIER_SYSTEM_PROMPT,
};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{ApiError, ApiMessage, MessagesRequest, MessagesResponse};
use crate::config::AnthropicConfig;

/// API version header value required by the Messages API.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A classifier implementation backed by the Anthropic Messages API.
///
/// Stateless: each classification is a single-turn call with the fixed
/// system prompt; no conversation history is kept.
pub struct AnthropicClassifier {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClassifier {
    /// Create a new classifier with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder().build().map_err(|e| {
            ClassifierError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, config })
    }

    /// Create a classifier from environment variables.
    ///
    /// See [`AnthropicConfig::from_env`] for the variables.
    pub fn from_env() -> Result<Self, ClassifierError> {
        Self::new(AnthropicConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Make a messages request and return the generated text.
    async fn complete(&self, user_input: String) -> Result<String, ClassifierError> {
        let url = format!("{}/v1/messages", self.config.api_url);

        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: CLASSIFIER_SYSTEM_PROMPT.to_string(),
            messages: vec![ApiMessage::user(user_input)],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(ClassifierError::Network(format!(
                    "API error ({}): {}: {}",
                    status.as_u16(),
                    api_error.error.error_type,
                    api_error.error.message
                )));
            }

            return Err(ClassifierError::Network(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Network(format!("Failed to parse response: {}", e)))?;

        debug!(stop_reason = ?completion.stop_reason, "Received classification response");

        Ok(completion.text())
    }
}

#[async_trait]
impl Classifier for AnthropicClassifier {
    async fn classify(&self, request: ClassifyRequest) -> Result<Classification, ClassifierError> {
        let user_input = build_prompt(&request);

        debug!(
            chars = request.text.len(),
            facts = request.knowledge.len(),
            "Classifying message"
        );

        let raw = self.complete(user_input).await?;

        parse_classification(&raw).map_err(|e| {
            warn!(error = %e, "Classification response failed validation");
            e
        })
    }

    fn name(&self) -> &str {
        "AnthropicClassifier"
    }
}
