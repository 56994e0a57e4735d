use crate::models;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::Instrument;

pub async fn fetch<'e, E>(executor: E, id: i32) -> Result<Option<models::Conversation>, String>
where
    E: PgExecutor<'e>,
{
    tracing::debug!("Fetch conversation {}", id);
    sqlx::query_as::<_, models::Conversation>(
        r#"
        SELECT id, conversation_type, name, class_id, direct_key, created_at, updated_at
        FROM conversations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch conversation, error: {:?}", err);
        "Could not fetch conversation".to_string()
    })
}

pub async fn fetch_by_direct_key<'e, E>(
    executor: E,
    direct_key: &str,
) -> Result<Option<models::Conversation>, String>
where
    E: PgExecutor<'e>,
{
    let query_span = tracing::info_span!("Search for direct conversation.", direct_key);
    sqlx::query_as::<_, models::Conversation>(
        r#"
        SELECT id, conversation_type, name, class_id, direct_key, created_at, updated_at
        FROM conversations
        WHERE direct_key = $1
        "#,
    )
    .bind(direct_key)
    .fetch_optional(executor)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch direct conversation, error: {:?}", err);
        "Could not fetch conversation".to_string()
    })
}

pub async fn fetch_by_user(
    pool: &PgPool,
    user_id: i32,
) -> Result<Vec<models::Conversation>, String> {
    let query_span = tracing::info_span!("Fetch conversations by user id.");
    sqlx::query_as::<_, models::Conversation>(
        r#"
        SELECT c.id, c.conversation_type, c.name, c.class_id, c.direct_key,
               c.created_at, c.updated_at
        FROM conversations c
        INNER JOIN conversation_participants p ON p.conversation_id = c.id
        WHERE p.user_id = $1
        ORDER BY c.updated_at DESC, c.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch conversations, error: {:?}", err);
        "Could not fetch conversations".to_string()
    })
}

/// Returns `None` when a DIRECT conversation for the same pair already exists.
pub async fn insert<'e, E>(
    executor: E,
    conversation: &models::NewConversation,
) -> Result<Option<models::Conversation>, String>
where
    E: PgExecutor<'e>,
{
    let query_span = tracing::info_span!("Saving new conversation into the database");
    sqlx::query_as::<_, models::Conversation>(
        r#"
        INSERT INTO conversations (conversation_type, name, class_id, direct_key, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        ON CONFLICT (direct_key) DO NOTHING
        RETURNING id, conversation_type, name, class_id, direct_key, created_at, updated_at
        "#,
    )
    .bind(conversation.conversation_type)
    .bind(&conversation.name)
    .bind(conversation.class_id)
    .bind(conversation.direct_key())
    .fetch_optional(executor)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert conversation".to_string()
    })
}

/// Refreshes `updated_at` and returns it, `None` when the conversation is gone.
/// The row lock taken here serializes sends; the timestamp is read after the
/// lock is granted and never moves backwards.
pub async fn touch<'e, E>(executor: E, id: i32) -> Result<Option<DateTime<Utc>>, String>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        UPDATE conversations
        SET updated_at = GREATEST(updated_at, clock_timestamp())
        WHERE id = $1
        RETURNING updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|err| {
        tracing::error!("Failed to touch conversation {}: {:?}", id, err);
        "Failed to update conversation".to_string()
    })
}

/// Locks the conversation row until the surrounding transaction ends.
pub async fn lock<'e, E>(executor: E, id: i32) -> Result<bool, String>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i32>("SELECT id FROM conversations WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map(|row| row.is_some())
        .map_err(|err| {
            tracing::error!("Failed to lock conversation {}: {:?}", id, err);
            "Failed to lock conversation".to_string()
        })
}

#[tracing::instrument(name = "Delete conversation.", skip(pool))]
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, String> {
    sqlx::query::<sqlx::Postgres>("DELETE FROM conversations WHERE id = $1;")
        .bind(id)
        .execute(pool)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Failed to delete conversation: {:?}", err);
            "Failed to delete conversation".to_string()
        })
}
