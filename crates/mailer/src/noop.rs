use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::{Email, Mailer};

/// Mailer that logs instead of sending. Used in tests and local runs
/// without email credentials.
#[derive(Debug, Default, Clone)]
pub struct NoOpMailer;

impl NoOpMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for NoOpMailer {
    async fn send(&self, email: Email) -> Result<()> {
        info!(to = %email.to, subject = %email.subject, "NoOpMailer: email not sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "NoOpMailer"
    }
}
