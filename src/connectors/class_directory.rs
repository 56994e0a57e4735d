use super::errors::ConnectorError;
use crate::db;
use crate::models::Class;
use sqlx::PgPool;

#[async_trait::async_trait]
pub trait ClassDirectory: Send + Sync {
    async fn fetch(&self, id: i32) -> Result<Option<Class>, ConnectorError>;

    /// Ids of the students enrolled in the class; the teacher is not included.
    async fn student_ids(&self, class_id: i32) -> Result<Vec<i32>, ConnectorError>;
}

pub struct PgClassDirectory {
    pool: PgPool,
}

impl PgClassDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ClassDirectory for PgClassDirectory {
    async fn fetch(&self, id: i32) -> Result<Option<Class>, ConnectorError> {
        Ok(db::class::fetch(&self.pool, id).await?)
    }

    async fn student_ids(&self, class_id: i32) -> Result<Vec<i32>, ConnectorError> {
        Ok(db::class::fetch_student_ids(&self.pool, class_id).await?)
    }
}
