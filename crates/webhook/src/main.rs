//! Twilio webhook server for Conserje.
//!
//! Receives inbound WhatsApp/SMS messages and runs them through the
//! processing pipeline: classification, persistence, routing, escalation,
//! and auto-reply.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anthropic_classifier::AnthropicClassifier;
use database::Database;
use knowledge::{KnowledgeSearcher, OpenAiEmbedder};
use mailer::{Mailer, NoOpMailer, ResendMailer};
use pipeline::{MessagePipeline, PipelineConfig, TwilioSender};
use tracing::{info, warn};
use twilio::TwilioClient;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting webhook server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Required providers
    let classifier = Arc::new(AnthropicClassifier::from_env()?);
    let delivery = Arc::new(TwilioSender::new(TwilioClient::from_env()?));

    // Optional providers degrade to keyword search / no email
    let embedder = match OpenAiEmbedder::from_env() {
        Ok(embedder) => Some(Arc::new(embedder) as Arc<dyn knowledge::EmbeddingProvider>),
        Err(e) => {
            warn!(error = %e, "Embeddings unavailable, knowledge search will use keywords only");
            None
        }
    };
    let mail: Arc<dyn Mailer> = match ResendMailer::from_env() {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            warn!(error = %e, "Email unavailable, escalation emails disabled");
            Arc::new(NoOpMailer::new())
        }
    };

    let searcher = KnowledgeSearcher::new(db.pool().clone(), embedder);

    let pipeline = MessagePipeline::new(
        db.pool().clone(),
        classifier,
        searcher,
        delivery,
        mail,
    )
    .with_config(PipelineConfig {
        classify_timeout: Duration::from_secs(config.classify_timeout_secs),
    });

    // Build application state and router
    let state = AppState::new(Arc::new(pipeline));
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Webhook server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
