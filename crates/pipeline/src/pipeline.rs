//! The inbound message pipeline.
//!
//! One invocation per webhook delivery, stateless between invocations.
//! The database is the only shared resource; the active-conversation
//! uniqueness index is the only cross-invocation invariant.

use std::sync::Arc;
use std::time::Duration;

use classifier_core::{Classification, Classifier, ClassifyRequest, Intent, SenderRole};
use database::models::{Building, Conversation, Resident};
use database::{DatabaseError, NewMessage};
use knowledge::KnowledgeSearcher;
use mailer::Mailer;
use sqlx::SqlitePool;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::escalation;
use crate::maintenance;
use crate::normalizer::{self, Channel};
use crate::resolver;
use crate::routing;
use crate::sender::DeliverySender;
use crate::texts;

/// Default bound on knowledge lookup + classifier latency. Twilio gives
/// webhooks roughly fifteen seconds before retrying.
const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(12);

/// Configuration for the message pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Combined budget for knowledge lookup and the classifier call.
    /// Exceeding it degrades to the deterministic fallback.
    pub classify_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classify_timeout: DEFAULT_CLASSIFY_TIMEOUT,
        }
    }
}

/// One inbound webhook delivery, as handed over by the webhook layer.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Transport message SID (idempotency key).
    pub provider_sid: String,
    /// Raw sender address, prefix included.
    pub from: String,
    /// Raw recipient address (the building's number).
    pub to: String,
    /// Message text.
    pub body: String,
}

/// Result of processing a single inbound message.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Message ran the full pipeline.
    Processed {
        conversation_id: String,
        intent: Intent,
        replied: bool,
        forwards: usize,
        escalated: bool,
    },
    /// Message was acknowledged without processing.
    Skipped { reason: String },
}

/// The pipeline: normalization, tenant/sender resolution, classification,
/// persistence, and the routing/escalation/reply fan-out.
pub struct MessagePipeline {
    pool: SqlitePool,
    classifier: Arc<dyn Classifier>,
    searcher: KnowledgeSearcher,
    delivery: Arc<dyn DeliverySender>,
    mail: Arc<dyn Mailer>,
    config: PipelineConfig,
}

impl MessagePipeline {
    pub fn new(
        pool: SqlitePool,
        classifier: Arc<dyn Classifier>,
        searcher: KnowledgeSearcher,
        delivery: Arc<dyn DeliverySender>,
        mail: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            pool,
            classifier,
            searcher,
            delivery,
            mail,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Process one inbound message.
    ///
    /// Only address validation surfaces as an error the webhook turns into
    /// a client failure; everything downstream is logged and acknowledged
    /// so the transport never retries a half-processed message.
    pub async fn handle(&self, inbound: InboundMessage) -> Result<ProcessOutcome> {
        let normalized = normalizer::normalize(&inbound.from, &inbound.to)?;
        let channel = normalized.channel;

        let Some(building) = database::building::find_building_by_inbound_number(
            &self.pool,
            &normalized.recipient,
            channel.as_str(),
        )
        .await?
        else {
            info!(recipient = %normalized.recipient, %channel, "No building for inbound number");
            return Ok(ProcessOutcome::Skipped {
                reason: "unrecognized recipient number".to_string(),
            });
        };

        if database::message::provider_sid_exists(&self.pool, &building.id, &inbound.provider_sid)
            .await?
        {
            info!(sid = %inbound.provider_sid, "Duplicate webhook delivery, already processed");
            return Ok(ProcessOutcome::Skipped {
                reason: "duplicate delivery".to_string(),
            });
        }

        let resident = match database::resident::find_resident_by_contact(
            &self.pool,
            &building.id,
            &normalized.sender,
            channel.as_str(),
        )
        .await
        {
            Ok(resident) => resident,
            Err(DatabaseError::NotFound { .. }) => {
                info!(sender = %normalized.sender, building_id = %building.id, "Unknown sender");
                self.send_unknown_sender_notice(&building, channel, &normalized).await;
                return Ok(ProcessOutcome::Skipped {
                    reason: "unknown sender".to_string(),
                });
            }
            Err(DatabaseError::Ambiguous { count, .. }) => {
                // Data defect: never guess which resident sent this. The
                // sender still gets the same notice an unknown number does.
                warn!(
                    sender = %normalized.sender,
                    building_id = %building.id,
                    count,
                    "Ambiguous sender contact, message not processed"
                );
                self.send_unknown_sender_notice(&building, channel, &normalized).await;
                return Ok(ProcessOutcome::Skipped {
                    reason: "ambiguous sender".to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let conversation =
            resolver::resolve_conversation(&self.pool, &building.id, &resident.id, channel).await?;

        let classification = self.classify(&building, &resident, &inbound.body).await;

        info!(
            conversation_id = %conversation.id,
            intent = classification.intent.as_str(),
            priority = classification.priority.as_str(),
            route_to = classification.route_to.as_str(),
            "Message classified"
        );

        self.persist_inbound(&conversation, channel, &inbound, &classification)
            .await;

        if let Err(e) = maintenance::maybe_create_request(
            &self.pool,
            &classification,
            &resident,
            &conversation.id,
            &inbound.body,
        )
        .await
        {
            error!(conversation_id = %conversation.id, error = %e, "Maintenance request creation failed");
        }

        // Independent fan-out: forwards, escalation, and the auto-reply
        // each capture their own failures
        let (forwards, escalated, replied) = tokio::join!(
            self.run_forwards(&resident, &classification, channel, &normalized, &inbound.body),
            self.run_escalation(&building, &resident, &classification, &inbound.body),
            self.run_reply(&resident, &classification, &conversation, channel, &normalized),
        );

        Ok(ProcessOutcome::Processed {
            conversation_id: conversation.id,
            intent: classification.intent,
            replied,
            forwards,
            escalated,
        })
    }

    /// Knowledge lookup + classification under one timeout. Never fails:
    /// timeout, provider error, and parse error all degrade to the
    /// deterministic fallback.
    async fn classify(
        &self,
        building: &Building,
        resident: &Resident,
        text: &str,
    ) -> Classification {
        let lookup_and_classify = async {
            let facts = self.searcher.search(&building.id, text).await;

            let request = ClassifyRequest {
                text: text.to_string(),
                sender_role: SenderRole::from_str(&resident.role),
                language: resident.language.clone(),
                building_name: building.name.clone(),
                knowledge: facts,
            };

            self.classifier.classify(request).await
        };

        match timeout(self.config.classify_timeout, lookup_and_classify).await {
            Ok(Ok(classification)) => classification,
            Ok(Err(e)) => {
                warn!(error = %e, "Classifier failed, using fallback");
                Classification::fallback(&resident.language)
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.config.classify_timeout.as_secs(),
                    "Classification timed out, using fallback"
                );
                Classification::fallback(&resident.language)
            }
        }
    }

    /// Append the resident message with its classification embedded.
    /// Persistence failure is logged; the fan-out still runs.
    async fn persist_inbound(
        &self,
        conversation: &Conversation,
        channel: Channel,
        inbound: &InboundMessage,
        classification: &Classification,
    ) {
        let new = NewMessage {
            conversation_id: conversation.id.clone(),
            provider_sid: Some(inbound.provider_sid.clone()),
            sender_type: "resident".to_string(),
            content: inbound.body.clone(),
            channel: channel.as_str().to_string(),
            intent: Some(classification.intent.as_str().to_string()),
            priority: Some(classification.priority.as_str().to_string()),
            route_to: Some(classification.route_to.as_str().to_string()),
            requires_human_review: Some(classification.requires_human_review),
        };

        if let Err(e) = database::message::append_message(&self.pool, &new).await {
            error!(conversation_id = %conversation.id, error = %e, "Failed to persist inbound message");
        }
    }

    async fn run_forwards(
        &self,
        resident: &Resident,
        classification: &Classification,
        channel: Channel,
        normalized: &normalizer::Normalized,
        raw_text: &str,
    ) -> usize {
        let Some(unit_id) = &resident.unit_id else {
            return 0;
        };

        let unit = match database::unit::get_unit(&self.pool, unit_id).await {
            Ok(unit) => unit,
            Err(e) => {
                warn!(unit_id, error = %e, "Unit not loadable, skipping forwards");
                return 0;
            }
        };

        routing::dispatch_forwards(
            &self.pool,
            self.delivery.as_ref(),
            classification.route_to,
            resident,
            &unit,
            channel,
            &normalized.recipient,
            raw_text,
        )
        .await
    }

    async fn run_escalation(
        &self,
        building: &Building,
        resident: &Resident,
        classification: &Classification,
        message_text: &str,
    ) -> bool {
        if !escalation::should_escalate(classification) {
            return false;
        }

        escalation::escalate(
            &self.pool,
            self.mail.as_ref(),
            building,
            resident,
            classification,
            message_text,
        )
        .await;

        true
    }

    /// Send the suggested reply back to the sender and persist it as an
    /// AI message. Returns whether a reply went out.
    async fn run_reply(
        &self,
        resident: &Resident,
        classification: &Classification,
        conversation: &Conversation,
        channel: Channel,
        normalized: &normalizer::Normalized,
    ) -> bool {
        if !escalation::should_auto_reply(classification) {
            info!(conversation_id = %conversation.id, "Auto-reply suppressed for human review");
            return false;
        }

        let Some(reply) = &classification.suggested_response else {
            return false;
        };

        if !resident.opted_in(channel.as_str()) {
            info!(resident_id = %resident.id, %channel, "Auto-reply skipped: not opted in");
            return false;
        }

        let Some(address) = resident.address_for_channel(channel.as_str()) else {
            info!(resident_id = %resident.id, %channel, "Auto-reply skipped: no contact address");
            return false;
        };

        match self
            .delivery
            .send(channel, &normalized.recipient, address, reply)
            .await
        {
            Ok(sid) => {
                let new = NewMessage {
                    conversation_id: conversation.id.clone(),
                    provider_sid: sid,
                    sender_type: "ai".to_string(),
                    content: reply.clone(),
                    channel: channel.as_str().to_string(),
                    ..Default::default()
                };

                if let Err(e) = database::message::append_message(&self.pool, &new).await {
                    error!(conversation_id = %conversation.id, error = %e, "Failed to persist AI reply");
                }

                true
            }
            Err(e) => {
                // Prior steps stay committed; the transport still gets a 200
                error!(conversation_id = %conversation.id, error = %e, "Auto-reply delivery failed");
                false
            }
        }
    }

    /// Best-effort notice to a sender the building cannot attribute to
    /// exactly one resident. No rows are created for such senders.
    async fn send_unknown_sender_notice(
        &self,
        building: &Building,
        channel: Channel,
        normalized: &normalizer::Normalized,
    ) {
        let notice = texts::unknown_sender_notice(&building.language);

        if let Err(e) = self
            .delivery
            .send(channel, &normalized.recipient, &normalized.sender, notice)
            .await
        {
            warn!(sender = %normalized.sender, error = %e, "Unknown-sender notice delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::sender::{FailingSender, RecordingSender, SentMessage};
    use classifier_core::{Priority, RouteTo};
    use database::models::{Building, Resident, Unit};
    use database::Database;
    use mailer::NoOpMailer;
    use mock_classifier::{CannedClassifier, DelayedClassifier, FailingClassifier};
    use std::collections::BTreeMap;

    const BUILDING_WA: &str = "+15550001111";
    const RENTER_PHONE: &str = "+15552223333";
    const OWNER_PHONE: &str = "+15554445555";

    struct Scenario {
        db: Database,
        sender: Arc<RecordingSender>,
    }

    impl Scenario {
        /// One building, one unit, an owner and a renter in it.
        async fn new() -> Self {
            let db = Database::connect("sqlite::memory:").await.unwrap();
            db.migrate().await.unwrap();

            let building = Building {
                id: "b1".to_string(),
                name: "Torre del Mar".to_string(),
                whatsapp_number: Some(BUILDING_WA.to_string()),
                sms_number: Some("+15550002222".to_string()),
                admin_email: Some("admin@torredelmar.example".to_string()),
                language: "es".to_string(),
                tier: "basic".to_string(),
                created_at: String::new(),
            };
            database::building::create_building(db.pool(), &building)
                .await
                .unwrap();

            let unit = Unit {
                id: "u1".to_string(),
                building_id: "b1".to_string(),
                unit_number: "5B".to_string(),
                owner_id: "owner1".to_string(),
                renter_id: Some("renter1".to_string()),
            };
            database::unit::create_unit(db.pool(), &unit).await.unwrap();

            for (id, name, role, phone) in [
                ("owner1", "Carlos Pérez", "owner", OWNER_PHONE),
                ("renter1", "Ana García", "renter", RENTER_PHONE),
            ] {
                let resident = Resident {
                    id: id.to_string(),
                    building_id: "b1".to_string(),
                    name: name.to_string(),
                    role: role.to_string(),
                    phone: Some(phone.to_string()),
                    whatsapp: None,
                    email: None,
                    whatsapp_opt_in: true,
                    sms_opt_in: true,
                    language: "es".to_string(),
                    unit_id: Some("u1".to_string()),
                    created_at: String::new(),
                };
                database::resident::create_resident(db.pool(), &resident)
                    .await
                    .unwrap();
            }

            Self {
                db,
                sender: Arc::new(RecordingSender::new()),
            }
        }

        fn pipeline(&self, classifier: Arc<dyn Classifier>) -> MessagePipeline {
            MessagePipeline::new(
                self.db.pool().clone(),
                classifier,
                KnowledgeSearcher::new(self.db.pool().clone(), None),
                self.sender.clone(),
                Arc::new(NoOpMailer::new()),
            )
        }

        fn sent(&self) -> Vec<SentMessage> {
            self.sender.sent()
        }
    }

    fn classification(
        intent: Intent,
        priority: Priority,
        route_to: RouteTo,
        review: bool,
        reply: Option<&str>,
    ) -> Classification {
        Classification {
            intent,
            priority,
            route_to,
            suggested_response: reply.map(String::from),
            requires_human_review: review,
            extracted_data: BTreeMap::new(),
        }
    }

    fn inbound_whatsapp(sid: &str, from: &str, body: &str) -> InboundMessage {
        InboundMessage {
            provider_sid: sid.to_string(),
            from: format!("whatsapp:{}", from),
            to: format!("whatsapp:{}", BUILDING_WA),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_happy_path_replies_and_persists() {
        let scenario = Scenario::new().await;
        let classifier = Arc::new(CannedClassifier::new(classification(
            Intent::GeneralQuestion,
            Priority::Low,
            RouteTo::Admin,
            false,
            Some("La piscina abre a las 8."),
        )));
        let pipeline = scenario.pipeline(classifier);

        let outcome = pipeline
            .handle(inbound_whatsapp("SM001", RENTER_PHONE, "¿A qué hora abre la piscina?"))
            .await
            .unwrap();

        let ProcessOutcome::Processed {
            conversation_id,
            replied,
            forwards,
            escalated,
            ..
        } = outcome
        else {
            panic!("expected Processed");
        };
        assert!(replied);
        assert_eq!(forwards, 0);
        assert!(!escalated);

        let sent = scenario.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, RENTER_PHONE);
        assert_eq!(sent[0].body, "La piscina abre a las 8.");

        let messages = database::message::list_for_conversation(scenario.db.pool(), &conversation_id)
            .await
            .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender_type, "resident");
        assert_eq!(messages[0].intent.as_deref(), Some("general_question"));
        assert_eq!(messages[1].sender_type, "ai");
        assert!(messages[1].intent.is_none());
    }

    #[tokio::test]
    async fn test_unknown_sender_gets_notice_and_no_rows() {
        let scenario = Scenario::new().await;
        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::fallback("es")));

        let outcome = pipeline
            .handle(inbound_whatsapp("SM002", "+19998887777", "hola"))
            .await
            .unwrap();

        assert!(matches!(outcome, ProcessOutcome::Skipped { reason } if reason == "unknown sender"));

        let sent = scenario.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "+19998887777");
        assert!(sent[0].body.contains("no está registrado"));

        let conversations =
            database::conversation::list_for_building(scenario.db.pool(), "b1")
                .await
                .unwrap();
        assert!(conversations.is_empty());
    }

    #[tokio::test]
    async fn test_ambiguous_sender_notified_but_not_processed() {
        let scenario = Scenario::new().await;

        // A second resident whose whatsapp equals the renter's phone makes
        // the whatsapp-channel lookup ambiguous
        let clashing = Resident {
            id: "r3".to_string(),
            building_id: "b1".to_string(),
            name: "Luis Mora".to_string(),
            role: "renter".to_string(),
            phone: Some("+15556667777".to_string()),
            whatsapp: Some(RENTER_PHONE.to_string()),
            email: None,
            whatsapp_opt_in: true,
            sms_opt_in: true,
            language: "es".to_string(),
            unit_id: None,
            created_at: String::new(),
        };
        database::resident::create_resident(scenario.db.pool(), &clashing)
            .await
            .unwrap();

        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::fallback("es")));
        let outcome = pipeline
            .handle(inbound_whatsapp("SM003", RENTER_PHONE, "hola"))
            .await
            .unwrap();

        assert!(
            matches!(outcome, ProcessOutcome::Skipped { reason } if reason == "ambiguous sender")
        );

        // The sender gets the same notice an unknown number would
        let sent = scenario.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, RENTER_PHONE);
        assert!(sent[0].body.contains("no está registrado"));

        // But nothing is persisted: we never guessed who was talking
        let conversations = database::conversation::list_for_building(scenario.db.pool(), "b1")
            .await
            .unwrap();
        assert!(conversations.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_sid_short_circuits() {
        let scenario = Scenario::new().await;
        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::new(classification(
            Intent::GeneralQuestion,
            Priority::Low,
            RouteTo::Admin,
            false,
            None,
        ))));

        let first = pipeline
            .handle(inbound_whatsapp("SM004", RENTER_PHONE, "hola"))
            .await
            .unwrap();
        let ProcessOutcome::Processed { conversation_id, .. } = first else {
            panic!("expected Processed");
        };

        let second = pipeline
            .handle(inbound_whatsapp("SM004", RENTER_PHONE, "hola"))
            .await
            .unwrap();
        assert!(
            matches!(second, ProcessOutcome::Skipped { reason } if reason == "duplicate delivery")
        );

        let messages = database::message::list_for_conversation(scenario.db.pool(), &conversation_id)
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_recipient_acks_without_side_effects() {
        let scenario = Scenario::new().await;
        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::fallback("es")));

        let outcome = pipeline
            .handle(InboundMessage {
                provider_sid: "SM005".to_string(),
                from: format!("whatsapp:{}", RENTER_PHONE),
                to: "whatsapp:+10000000000".to_string(),
                body: "hola".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, ProcessOutcome::Skipped { .. }));
        assert!(scenario.sent().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_address_is_validation_error() {
        let scenario = Scenario::new().await;
        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::fallback("es")));

        let result = pipeline
            .handle(InboundMessage {
                provider_sid: "SM006".to_string(),
                from: "whatsapp:garbage".to_string(),
                to: format!("whatsapp:{}", BUILDING_WA),
                body: "hola".to_string(),
            })
            .await;

        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[tokio::test]
    async fn test_elevated_review_suppresses_reply_and_escalates() {
        let scenario = Scenario::new().await;
        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::new(classification(
            Intent::Emergency,
            Priority::Emergency,
            RouteTo::Admin,
            true,
            Some("should not be sent"),
        ))));

        let outcome = pipeline
            .handle(inbound_whatsapp("SM007", RENTER_PHONE, "¡Incendio en el lobby!"))
            .await
            .unwrap();

        let ProcessOutcome::Processed { replied, escalated, .. } = outcome else {
            panic!("expected Processed");
        };
        assert!(!replied);
        assert!(escalated);
        assert!(scenario.sent().is_empty());

        let notifications = database::notification::list_unread(scenario.db.pool(), "b1")
            .await
            .unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].severity, "urgent");
    }

    #[tokio::test]
    async fn test_renter_message_forwarded_to_owner() {
        let scenario = Scenario::new().await;
        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::new(classification(
            Intent::Complaint,
            Priority::Medium,
            RouteTo::Owner,
            false,
            Some("Gracias, lo hemos reenviado."),
        ))));

        let outcome = pipeline
            .handle(inbound_whatsapp("SM008", RENTER_PHONE, "El aire acondicionado gotea"))
            .await
            .unwrap();

        let ProcessOutcome::Processed { forwards, .. } = outcome else {
            panic!("expected Processed");
        };
        assert_eq!(forwards, 1);

        let sent = scenario.sent();
        let forward = sent.iter().find(|m| m.to == OWNER_PHONE).unwrap();
        assert!(forward.body.contains("Ana García"));
        assert!(forward.body.contains("5B"));
        assert!(forward.body.contains("El aire acondicionado gotea"));

        // Reply also went out to the original sender
        assert!(sent.iter().any(|m| m.to == RENTER_PHONE));
    }

    #[tokio::test]
    async fn test_opted_out_recipient_not_forwarded() {
        let scenario = Scenario::new().await;

        let mut owner = database::resident::get_resident(scenario.db.pool(), "owner1")
            .await
            .unwrap();
        owner.whatsapp_opt_in = false;
        database::resident::update_resident(scenario.db.pool(), &owner)
            .await
            .unwrap();

        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::new(classification(
            Intent::Complaint,
            Priority::Medium,
            RouteTo::Owner,
            false,
            None,
        ))));

        let outcome = pipeline
            .handle(inbound_whatsapp("SM009", RENTER_PHONE, "queja"))
            .await
            .unwrap();

        let ProcessOutcome::Processed { forwards, .. } = outcome else {
            panic!("expected Processed");
        };
        assert_eq!(forwards, 0);
        assert!(scenario.sent().is_empty());
    }

    #[tokio::test]
    async fn test_both_route_excludes_sender() {
        let scenario = Scenario::new().await;
        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::new(classification(
            Intent::GeneralQuestion,
            Priority::Low,
            RouteTo::Both,
            false,
            None,
        ))));

        pipeline
            .handle(inbound_whatsapp("SM010", OWNER_PHONE, "aviso para todos"))
            .await
            .unwrap();

        let sent = scenario.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, RENTER_PHONE);
    }

    #[tokio::test]
    async fn test_maintenance_request_created_through_pipeline() {
        let scenario = Scenario::new().await;

        let mut c = classification(
            Intent::MaintenanceRequest,
            Priority::High,
            RouteTo::Admin,
            false,
            Some("Un técnico lo revisará."),
        );
        c.extracted_data.insert(
            "maintenance_category".to_string(),
            serde_json::Value::String("plumbing".to_string()),
        );
        let pipeline = scenario.pipeline(Arc::new(CannedClassifier::new(c)));

        pipeline
            .handle(inbound_whatsapp("SM011", RENTER_PHONE, "Hay una fuga en el baño"))
            .await
            .unwrap();

        let requests =
            database::maintenance::list_for_building(scenario.db.pool(), "b1", Some("open"))
                .await
                .unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].category, "plumbing");
        assert_eq!(requests[0].unit_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_classifier_failure_degrades_to_fallback() {
        let scenario = Scenario::new().await;
        let pipeline = scenario.pipeline(Arc::new(FailingClassifier::new()));

        let outcome = pipeline
            .handle(inbound_whatsapp("SM012", RENTER_PHONE, "hola"))
            .await
            .unwrap();

        let ProcessOutcome::Processed { intent, replied, .. } = outcome else {
            panic!("expected Processed");
        };
        assert_eq!(intent, Intent::Other);
        // Fallback is medium priority, so the canned reply still goes out
        assert!(replied);

        let sent = scenario.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("administrador"));
    }

    #[tokio::test]
    async fn test_classifier_timeout_degrades_to_fallback() {
        let scenario = Scenario::new().await;

        let slow = DelayedClassifier::with_millis(
            CannedClassifier::new(classification(
                Intent::GeneralQuestion,
                Priority::Low,
                RouteTo::Admin,
                false,
                Some("too late"),
            )),
            500,
        );

        let pipeline = scenario
            .pipeline(Arc::new(slow))
            .with_config(PipelineConfig {
                classify_timeout: Duration::from_millis(50),
            });

        let outcome = pipeline
            .handle(inbound_whatsapp("SM013", RENTER_PHONE, "hola"))
            .await
            .unwrap();

        let ProcessOutcome::Processed { intent, .. } = outcome else {
            panic!("expected Processed");
        };
        assert_eq!(intent, Intent::Other);

        let sent = scenario.sent();
        assert_eq!(sent.len(), 1);
        assert_ne!(sent[0].body, "too late");
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_fail_pipeline() {
        let scenario = Scenario::new().await;
        let pipeline = MessagePipeline::new(
            scenario.db.pool().clone(),
            Arc::new(CannedClassifier::new(classification(
                Intent::GeneralQuestion,
                Priority::Low,
                RouteTo::Owner,
                false,
                Some("respuesta"),
            ))),
            KnowledgeSearcher::new(scenario.db.pool().clone(), None),
            Arc::new(FailingSender),
            Arc::new(NoOpMailer::new()),
        );

        let outcome = pipeline
            .handle(inbound_whatsapp("SM014", RENTER_PHONE, "hola"))
            .await
            .unwrap();

        let ProcessOutcome::Processed {
            conversation_id,
            replied,
            forwards,
            ..
        } = outcome
        else {
            panic!("expected Processed");
        };
        assert!(!replied);
        assert_eq!(forwards, 0);

        // The inbound message is still committed
        let messages = database::message::list_for_conversation(scenario.db.pool(), &conversation_id)
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender_type, "resident");
    }
}
