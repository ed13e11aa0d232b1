//! Client for the Twilio Messages API.
//!
//! Handles outbound delivery for both WhatsApp and SMS. The only
//! channel-specific wrinkle is addressing: WhatsApp numbers carry a
//! `whatsapp:` prefix on the wire, SMS numbers are bare E.164.

mod client;
mod config;
mod error;

pub use client::{channel_address, SendResult, TwilioClient};
pub use config::TwilioConfig;
pub use error::{Result, TwilioError};
