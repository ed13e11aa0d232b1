//! Inbound message processing for Conserje.
//!
//! A webhook delivery flows through: channel normalization, building and
//! resident resolution, race-safe conversation resolution, knowledge-grounded
//! classification (timeout-bounded, with a deterministic fallback), message
//! persistence, maintenance extraction, and an independent fan-out of
//! recipient forwards, escalation, and the auto-reply.
//!
//! Only address validation errors reach the webhook layer; everything else
//! is logged and acknowledged so the transport never retries.

mod error;
mod escalation;
mod maintenance;
mod normalizer;
mod pipeline;
mod resolver;
mod routing;
mod sender;
mod texts;

pub use error::{PipelineError, Result};
pub use escalation::{escalate, should_auto_reply, should_escalate};
pub use maintenance::maybe_create_request;
pub use normalizer::{normalize, Channel, NormalizeError, Normalized};
pub use pipeline::{InboundMessage, MessagePipeline, PipelineConfig, ProcessOutcome};
pub use resolver::resolve_conversation;
pub use routing::{dispatch_forwards, forward_recipients};
pub use sender::{
    DeliveryError, DeliverySender, FailingSender, LoggingSender, NoOpSender, RecordingSender,
    SentMessage, TwilioSender,
};
pub use texts::{forward_wrapper, unknown_sender_notice};
