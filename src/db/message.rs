use crate::models;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::Instrument;

pub async fn insert<'e, E>(
    executor: E,
    message: &models::NewMessage,
    created_at: DateTime<Utc>,
) -> Result<models::Message, String>
where
    E: PgExecutor<'e>,
{
    let query_span = tracing::info_span!("Saving new message into the database");
    sqlx::query_as::<_, models::Message>(
        r#"
        INSERT INTO messages (conversation_id, sender_id, content, file_paths, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, conversation_id, sender_id, content, file_paths, created_at, read_at
        "#,
    )
    .bind(message.conversation_id)
    .bind(message.sender_id)
    .bind(&message.content)
    .bind(message.joined_file_paths())
    .bind(created_at)
    .fetch_one(executor)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert message".to_string()
    })
}

pub async fn fetch_by_conversation(
    pool: &PgPool,
    conversation_id: i32,
    order: models::MessageOrder,
    limit: Option<i64>,
) -> Result<Vec<models::Message>, String> {
    let query_span = tracing::info_span!("Fetch conversation messages.", conversation_id, ?order);
    let sql = match order {
        models::MessageOrder::Asc => {
            r#"
            SELECT id, conversation_id, sender_id, content, file_paths, created_at, read_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2
            "#
        }
        models::MessageOrder::Desc => {
            r#"
            SELECT id, conversation_id, sender_id, content, file_paths, created_at, read_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#
        }
    };

    // LIMIT NULL means no limit in postgres
    sqlx::query_as::<_, models::Message>(sql)
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch messages, error: {:?}", err);
            "Could not fetch messages".to_string()
        })
}

/// Stamps `read_at` on messages other participants sent to `reader_id`.
pub async fn mark_read<'e, E>(
    executor: E,
    conversation_id: i32,
    reader_id: i32,
) -> Result<u64, String>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE messages
        SET read_at = NOW()
        WHERE conversation_id = $1 AND sender_id <> $2 AND read_at IS NULL
        "#,
    )
    .bind(conversation_id)
    .bind(reader_id)
    .execute(executor)
    .await
    .map(|result| result.rows_affected())
    .map_err(|err| {
        tracing::error!("Failed to mark messages read: {:?}", err);
        "Failed to mark messages read".to_string()
    })
}
