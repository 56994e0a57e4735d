use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Participant {
    pub id: i32,
    pub conversation_id: i32,
    pub user_id: i32,
    pub unread_count: i32, // never negative, reset by mark-read
    pub joined_at: DateTime<Utc>,
}
