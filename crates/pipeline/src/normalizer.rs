//! Channel detection and address normalization.
//!
//! Pure functions, no I/O. Twilio delivers WhatsApp traffic with a
//! `whatsapp:` prefix on both addresses; SMS arrives as bare E.164.

use database::validation::is_e164;
use thiserror::Error;

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Delivery channel for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Whatsapp,
    Sms,
}

impl Channel {
    /// The string stored in conversation and message rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Whatsapp => "whatsapp",
            Channel::Sms => "sms",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Empty address")]
    Empty,

    #[error("Malformed address: {0}")]
    Malformed(String),
}

/// A normalized inbound envelope: detected channel plus bare addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub channel: Channel,
    /// The resident's number, prefix stripped.
    pub sender: String,
    /// The building's inbound number, prefix stripped.
    pub recipient: String,
}

/// Detect the channel from the sender address and strip transport
/// prefixes from both addresses.
///
/// The sender address decides the channel; a stray prefix on only the
/// recipient is still stripped so number comparison works.
pub fn normalize(raw_sender: &str, raw_recipient: &str) -> Result<Normalized, NormalizeError> {
    let channel = if raw_sender.trim().starts_with(WHATSAPP_PREFIX) {
        Channel::Whatsapp
    } else {
        Channel::Sms
    };

    let sender = normalize_address(raw_sender)?;
    let recipient = normalize_address(raw_recipient)?;

    Ok(Normalized {
        channel,
        sender,
        recipient,
    })
}

/// Strip the transport prefix and validate the remainder looks like an
/// E.164 number: optional `+`, 7 to 15 digits.
fn normalize_address(raw: &str) -> Result<String, NormalizeError> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix(WHATSAPP_PREFIX).unwrap_or(trimmed);

    if stripped.is_empty() {
        return Err(NormalizeError::Empty);
    }

    if !is_e164(stripped) {
        return Err(NormalizeError::Malformed(stripped.to_string()));
    }

    Ok(stripped.to_string())
}
