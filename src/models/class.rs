use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Class {
    pub id: i32,
    pub name: String,
    pub teacher_id: i32,
    pub created_at: DateTime<Utc>,
}
