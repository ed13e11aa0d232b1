//! Escalation email delivery.
//!
//! The pipeline emails building admins when a message escalates. The
//! [`Mailer`] trait is the seam; [`ResendMailer`] is the production
//! implementation and [`NoOpMailer`] keeps tests and local runs quiet.

mod error;
mod noop;
mod resend;

pub use error::{MailerError, Result};
pub use noop::NoOpMailer;
pub use resend::{ResendConfig, ResendMailer};

use async_trait::async_trait;

/// An outbound email.
#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sends email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one email.
    async fn send(&self, email: Email) -> Result<()>;

    /// Implementation name for logging.
    fn name(&self) -> &str;
}
