//! Outbound delivery trait and implementations.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

use crate::normalizer::Channel;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Twilio(#[from] twilio::TwilioError),

    #[error("Delivery failed: {0}")]
    Failed(String),
}

/// Trait for delivering outbound messages on a channel.
///
/// Abstracted to support different transports (Twilio, tests, etc.)
#[async_trait]
pub trait DeliverySender: Send + Sync {
    /// Send a message.
    ///
    /// Returns the provider's message SID when the transport reports one.
    async fn send(
        &self,
        channel: Channel,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<Option<String>, DeliveryError>;
}

/// Production sender backed by the Twilio Messages API.
pub struct TwilioSender {
    client: twilio::TwilioClient,
}

impl TwilioSender {
    pub fn new(client: twilio::TwilioClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeliverySender for TwilioSender {
    async fn send(
        &self,
        channel: Channel,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<Option<String>, DeliveryError> {
        let result = self
            .client
            .send_message(channel.as_str(), from, to, body)
            .await?;

        Ok(Some(result.sid))
    }
}

/// A no-op sender for tests and dry runs that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl DeliverySender for NoOpSender {
    async fn send(
        &self,
        _channel: Channel,
        _from: &str,
        _to: &str,
        _body: &str,
    ) -> Result<Option<String>, DeliveryError> {
        Ok(None)
    }
}

/// A sender that logs all operations without delivering.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl DeliverySender for LoggingSender {
    async fn send(
        &self,
        channel: Channel,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<Option<String>, DeliveryError> {
        info!("[{}] Sending from {} to {}: {}", channel, from, to, body);
        Ok(None)
    }
}

/// One message captured by [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel: Channel,
    pub from: String,
    pub to: String,
    pub body: String,
}

/// A sender that records every message for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DeliverySender for RecordingSender {
    async fn send(
        &self,
        channel: Channel,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<Option<String>, DeliveryError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage {
                channel,
                from: from.to_string(),
                to: to.to_string(),
                body: body.to_string(),
            });
        }
        Ok(None)
    }
}

/// A sender that fails every send, for failure-policy tests.
#[derive(Debug, Clone, Default)]
pub struct FailingSender;

#[async_trait]
impl DeliverySender for FailingSender {
    async fn send(
        &self,
        _channel: Channel,
        _from: &str,
        _to: &str,
        _body: &str,
    ) -> Result<Option<String>, DeliveryError> {
        Err(DeliveryError::Failed("sender configured to fail".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sender() {
        let sender = NoOpSender;
        let sid = sender
            .send(Channel::Sms, "+15550000001", "+15550000002", "test")
            .await
            .unwrap();
        assert!(sid.is_none());
    }

    #[tokio::test]
    async fn test_recording_sender_captures() {
        let sender = RecordingSender::new();
        sender
            .send(Channel::Whatsapp, "+15550000001", "+15550000002", "hola")
            .await
            .unwrap();

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "+15550000002");
        assert_eq!(sent[0].body, "hola");
    }

    #[tokio::test]
    async fn test_failing_sender_errors() {
        let sender = FailingSender;
        let result = sender
            .send(Channel::Sms, "+15550000001", "+15550000002", "test")
            .await;
        assert!(result.is_err());
    }
}
