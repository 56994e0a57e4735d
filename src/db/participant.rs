use crate::models;
use sqlx::{PgExecutor, PgPool};
use tracing::Instrument;

pub async fn fetch_by_conversation<'e, E>(
    executor: E,
    conversation_id: i32,
) -> Result<Vec<models::Participant>, String>
where
    E: PgExecutor<'e>,
{
    let query_span = tracing::info_span!("Fetch conversation participants.", conversation_id);
    sqlx::query_as::<_, models::Participant>(
        r#"
        SELECT id, conversation_id, user_id, unread_count, joined_at
        FROM conversation_participants
        WHERE conversation_id = $1
        ORDER BY joined_at ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(executor)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch participants, error: {:?}", err);
        "Could not fetch participants".to_string()
    })
}

/// Idempotent: an existing membership is returned untouched.
pub async fn insert<'e, E>(
    executor: E,
    conversation_id: i32,
    user_id: i32,
) -> Result<models::Participant, String>
where
    E: PgExecutor<'e>,
{
    let query_span = tracing::info_span!("Saving conversation participant", conversation_id, user_id);
    sqlx::query_as::<_, models::Participant>(
        r#"
        INSERT INTO conversation_participants (conversation_id, user_id, unread_count, joined_at)
        VALUES ($1, $2, 0, NOW())
        ON CONFLICT (conversation_id, user_id)
        DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING id, conversation_id, user_id, unread_count, joined_at
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(executor)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert participant".to_string()
    })
}

pub async fn delete<'e, E>(executor: E, conversation_id: i32, user_id: i32) -> Result<bool, String>
where
    E: PgExecutor<'e>,
{
    sqlx::query("DELETE FROM conversation_participants WHERE conversation_id = $1 AND user_id = $2")
        .bind(conversation_id)
        .bind(user_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Failed to delete participant: {:?}", err);
            "Failed to delete participant".to_string()
        })
}

/// One statement for all recipients, so concurrent sends never lose an increment.
pub async fn increment_unread<'e, E>(
    executor: E,
    conversation_id: i32,
    sender_id: i32,
) -> Result<u64, String>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE conversation_participants
        SET unread_count = COALESCE(unread_count, 0) + 1
        WHERE conversation_id = $1 AND user_id <> $2
        "#,
    )
    .bind(conversation_id)
    .bind(sender_id)
    .execute(executor)
    .await
    .map(|result| result.rows_affected())
    .map_err(|err| {
        tracing::error!("Failed to increment unread counters: {:?}", err);
        "Failed to update unread counters".to_string()
    })
}

/// `false` when the user is not a participant.
pub async fn reset_unread<'e, E>(
    executor: E,
    conversation_id: i32,
    user_id: i32,
) -> Result<bool, String>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE conversation_participants
        SET unread_count = 0
        WHERE conversation_id = $1 AND user_id = $2
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .execute(executor)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Failed to reset unread counter: {:?}", err);
        "Failed to update unread counter".to_string()
    })
}

pub async fn unread_total(pool: &PgPool, user_id: i32) -> Result<i64, String> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(unread_count), 0)::BIGINT FROM conversation_participants WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to sum unread counters: {:?}", err);
        "Could not fetch unread count".to_string()
    })
}
