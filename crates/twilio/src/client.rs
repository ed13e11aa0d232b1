//! Twilio Messages API client.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::TwilioConfig;
use crate::error::{Result, TwilioError};

/// Result of a successful send.
#[derive(Debug, Clone)]
pub struct SendResult {
    /// Twilio message SID.
    pub sid: String,

    /// Delivery status as reported at creation ("queued", "sent", ...).
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct TwilioApiError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

/// Prefix a number for a channel the way the Messages API expects:
/// `whatsapp:+1555...` for WhatsApp, the bare E.164 number for SMS.
pub fn channel_address(channel: &str, number: &str) -> String {
    match channel {
        "whatsapp" if !number.starts_with("whatsapp:") => format!("whatsapp:{}", number),
        _ => number.to_string(),
    }
}

/// Client for sending messages through the Twilio Messages API.
pub struct TwilioClient {
    client: Client,
    config: TwilioConfig,
}

impl TwilioClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TwilioConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|e| {
            TwilioError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(TwilioConfig::from_env()?)
    }

    /// Send a message on a channel.
    ///
    /// `from` and `to` are bare E.164 numbers; the channel prefix is
    /// applied here.
    pub async fn send_message(
        &self,
        channel: &str,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<SendResult> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_url, self.config.account_sid
        );

        let params = [
            ("From", channel_address(channel, from)),
            ("To", channel_address(channel, to)),
            ("Body", body.to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| TwilioError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<TwilioApiError>(&error_text) {
                return Err(TwilioError::Api {
                    status: status.as_u16(),
                    code: api_error.code,
                    message: api_error.message,
                });
            }

            return Err(TwilioError::Api {
                status: status.as_u16(),
                code: None,
                message: error_text,
            });
        }

        let resource: MessageResource = response
            .json()
            .await
            .map_err(|e| TwilioError::Network(format!("Failed to parse response: {}", e)))?;

        debug!(sid = %resource.sid, status = %resource.status, "Message accepted by Twilio");

        Ok(SendResult {
            sid: resource.sid,
            status: resource.status,
        })
    }
}
