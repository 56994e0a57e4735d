use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub file_paths: Option<String>, // comma-joined stored locations
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Stored attachment paths in their original order, blanks dropped.
    pub fn attachment_paths(&self) -> Vec<&str> {
        self.file_paths
            .as_deref()
            .map(|paths| {
                paths
                    .split(',')
                    .map(str::trim)
                    .filter(|path| !path.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub file_paths: Vec<String>,
}

impl NewMessage {
    /// Joined form persisted in `messages.file_paths`, `None` when there is nothing to store.
    pub fn joined_file_paths(&self) -> Option<String> {
        let paths: Vec<&str> = self
            .file_paths
            .iter()
            .map(|path| path.trim())
            .filter(|path| !path.is_empty())
            .collect();

        if paths.is_empty() {
            None
        } else {
            Some(paths.join(","))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrder {
    /// Chat history, oldest first.
    #[default]
    Asc,
    /// Previews, newest first.
    Desc,
}
