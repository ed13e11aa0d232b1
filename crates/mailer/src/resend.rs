//! Mailer backed by the Resend API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::env;
use tracing::debug;

use crate::error::{MailerError, Result};
use crate::{Email, Mailer};

/// Configuration for [`ResendMailer`].
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// Resend API URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Sender address for all escalation emails.
    pub from: String,
}

impl ResendConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `RESEND_API_KEY` | API key | (required) |
    /// | `RESEND_FROM` | Sender address | (required) |
    /// | `RESEND_API_URL` | API URL | `https://api.resend.com` |
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("RESEND_API_KEY")
            .map_err(|_| MailerError::Configuration("RESEND_API_KEY not set".to_string()))?;

        let from = env::var("RESEND_FROM")
            .map_err(|_| MailerError::Configuration("RESEND_FROM not set".to_string()))?;

        let api_url =
            env::var("RESEND_API_URL").unwrap_or_else(|_| "https://api.resend.com".to_string());

        Ok(Self {
            api_url,
            api_key,
            from,
        })
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    text: String,
}

/// Mailer implementation backed by the Resend email API.
pub struct ResendMailer {
    client: Client,
    config: ResendConfig,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|e| {
            MailerError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ResendConfig::from_env()?)
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: Email) -> Result<()> {
        let url = format!("{}/emails", self.config.api_url);

        let request = SendEmailRequest {
            from: self.config.from.clone(),
            to: vec![email.to],
            subject: email.subject,
            text: email.body,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| MailerError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        debug!("Escalation email accepted by Resend");

        Ok(())
    }

    fn name(&self) -> &str {
        "ResendMailer"
    }
}
