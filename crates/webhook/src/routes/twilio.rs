//! Twilio inbound message webhook.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{error, info};

use pipeline::{InboundMessage, PipelineError, ProcessOutcome};

use crate::error::WebhookError;
use crate::state::AppState;

/// Empty TwiML response: acknowledge without sending anything inline.
/// Outbound messages go through the REST API, not the webhook reply.
const EMPTY_TWIML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#;

/// Form payload Twilio posts for an inbound message.
///
/// All fields are optional at the serde layer so missing ones produce our
/// 400 instead of an extractor rejection. Media fields are accepted but
/// not processed.
#[derive(Debug, Deserialize)]
pub struct TwilioInbound {
    #[serde(rename = "MessageSid")]
    pub message_sid: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "NumMedia")]
    pub num_media: Option<String>,
    #[serde(rename = "MediaUrl0")]
    pub media_url: Option<String>,
    #[serde(rename = "MediaContentType0")]
    pub media_content_type: Option<String>,
}

fn required(field: Option<String>, name: &str) -> Result<String, WebhookError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(WebhookError::BadRequest(format!("Missing field: {name}"))),
    }
}

/// Handle an inbound message webhook.
///
/// Returns 400 only for missing fields or malformed addresses. Every
/// other outcome, including internal failures, acknowledges with 200 so
/// Twilio does not retry into a storm.
pub async fn inbound(
    State(state): State<AppState>,
    Form(payload): Form<TwilioInbound>,
) -> Result<Response, WebhookError> {
    let inbound = InboundMessage {
        provider_sid: required(payload.message_sid, "MessageSid")?,
        from: required(payload.from, "From")?,
        to: required(payload.to, "To")?,
        body: required(payload.body, "Body")?,
    };

    if payload.media_url.is_some() {
        info!(
            num_media = payload.num_media.as_deref().unwrap_or("?"),
            content_type = payload.media_content_type.as_deref().unwrap_or("?"),
            "Inbound message carries media, ignoring attachments"
        );
    }

    match state.pipeline.handle(inbound).await {
        Ok(ProcessOutcome::Processed {
            conversation_id,
            intent,
            replied,
            forwards,
            escalated,
        }) => {
            info!(
                %conversation_id,
                intent = intent.as_str(),
                replied,
                forwards,
                escalated,
                "Inbound message processed"
            );
        }
        Ok(ProcessOutcome::Skipped { reason }) => {
            info!(reason, "Inbound message acknowledged without processing");
        }
        Err(PipelineError::Validation(e)) => {
            return Err(WebhookError::BadRequest(e.to_string()));
        }
        Err(e) => {
            // Acknowledged anyway; Twilio retrying would not help
            error!(error = %e, "Pipeline failed on inbound message");
        }
    }

    Ok(twiml_ok())
}

/// Webhook verification endpoint.
pub async fn verify() -> &'static str {
    "Conserje webhook active"
}

fn twiml_ok() -> Response {
    ([(header::CONTENT_TYPE, "text/xml")], EMPTY_TWIML).into_response()
}
