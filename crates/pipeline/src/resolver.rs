//! Race-safe conversation resolution.

use database::models::Conversation;
use database::DatabaseError;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::normalizer::Channel;

/// Find or create the single active conversation for a
/// (building, resident, channel) tuple.
///
/// Twilio retries webhooks, so two invocations for the same sender can
/// race on first contact. A losing insert hits the partial unique index
/// and re-fetches the winner instead of erroring.
pub async fn resolve_conversation(
    pool: &SqlitePool,
    building_id: &str,
    resident_id: &str,
    channel: Channel,
) -> Result<Conversation> {
    if let Some(existing) =
        database::conversation::find_active(pool, building_id, resident_id, channel.as_str())
            .await?
    {
        database::conversation::touch(pool, &existing.id).await?;
        return Ok(existing);
    }

    match database::conversation::create_active(pool, building_id, resident_id, channel.as_str())
        .await
    {
        Ok(created) => Ok(created),
        Err(DatabaseError::AlreadyExists { .. }) => {
            // Lost the race; the winner's row is the conversation
            debug!(resident_id, "Conversation insert lost a race, re-fetching winner");

            let winner = database::conversation::find_active(
                pool,
                building_id,
                resident_id,
                channel.as_str(),
            )
            .await?
            .ok_or(DatabaseError::NotFound {
                entity: "Conversation",
                id: resident_id.to_string(),
            })?;

            Ok(winner)
        }
        Err(e) => Err(e.into()),
    }
}
