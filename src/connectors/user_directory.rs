use super::errors::ConnectorError;
use crate::db;
use crate::models::User;
use sqlx::PgPool;

#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn fetch(&self, id: i32) -> Result<Option<User>, ConnectorError>;

    async fn fetch_by_username(&self, username: &str) -> Result<Option<User>, ConnectorError>;
}

/// Reads the `users` table shared with the rest of the LMS.
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserDirectory for PgUserDirectory {
    async fn fetch(&self, id: i32) -> Result<Option<User>, ConnectorError> {
        Ok(db::user::fetch(&self.pool, id).await?)
    }

    async fn fetch_by_username(&self, username: &str) -> Result<Option<User>, ConnectorError> {
        Ok(db::user::fetch_by_username(&self.pool, username).await?)
    }
}
