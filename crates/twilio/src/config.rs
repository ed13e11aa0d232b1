//! Configuration for the Twilio client.

use std::env;

use crate::error::{Result, TwilioError};

/// Configuration for [`TwilioClient`](crate::TwilioClient).
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio API URL.
    pub api_url: String,

    /// Account SID (also the basic-auth username).
    pub account_sid: String,

    /// Auth token (basic-auth password).
    pub auth_token: String,
}

impl TwilioConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TWILIO_ACCOUNT_SID` | Account SID | (required) |
    /// | `TWILIO_AUTH_TOKEN` | Auth token | (required) |
    /// | `TWILIO_API_URL` | API URL | `https://api.twilio.com` |
    pub fn from_env() -> Result<Self> {
        let account_sid = env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| TwilioError::Configuration("TWILIO_ACCOUNT_SID not set".to_string()))?;

        let auth_token = env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| TwilioError::Configuration("TWILIO_AUTH_TOKEN not set".to_string()))?;

        let api_url =
            env::var("TWILIO_API_URL").unwrap_or_else(|_| "https://api.twilio.com".to_string());

        Ok(Self {
            api_url,
            account_sid,
            auth_token,
        })
    }
}
