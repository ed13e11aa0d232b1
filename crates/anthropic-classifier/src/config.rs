//! Configuration for the Anthropic classifier.

use classifier_core::ClassifierError;
use std::env;

/// Configuration for [`AnthropicClassifier`](crate::AnthropicClassifier).
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// Anthropic API URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for the classification response.
    pub max_tokens: u32,

    /// Temperature for generation. Classification wants determinism.
    pub temperature: f32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 512,
            temperature: 0.0,
        }
    }
}

impl AnthropicConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ANTHROPIC_API_KEY` | API key | (required) |
    /// | `ANTHROPIC_API_URL` | API URL | `https://api.anthropic.com` |
    /// | `ANTHROPIC_MODEL` | Model name | `claude-3-5-haiku-latest` |
    /// | `ANTHROPIC_MAX_TOKENS` | Max response tokens | `512` |
    pub fn from_env() -> Result<Self, ClassifierError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ClassifierError::Configuration("ANTHROPIC_API_KEY not set".to_string()))?;

        let api_url = env::var("ANTHROPIC_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com".to_string());

        let model = env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| "claude-3-5-haiku-latest".to_string());

        let max_tokens = env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(512);

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
            temperature: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnthropicConfig::default();
        assert_eq!(config.api_url, "https://api.anthropic.com");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, 512);
    }
}
