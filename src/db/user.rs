use crate::models;
use sqlx::PgPool;

pub async fn fetch(pool: &PgPool, id: i32) -> Result<Option<models::User>, String> {
    sqlx::query_as::<_, models::User>(
        "SELECT id, username, full_name, role, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch user {}, error: {:?}", id, err);
        "Could not fetch user".to_string()
    })
}

pub async fn fetch_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<models::User>, String> {
    sqlx::query_as::<_, models::User>(
        "SELECT id, username, full_name, role, created_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch user {}, error: {:?}", username, err);
        "Could not fetch user".to_string()
    })
}
