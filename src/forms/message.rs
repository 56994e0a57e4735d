use crate::models::MessageOrder;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct SendMessage {
    #[validate(minimum = 1)]
    pub sender_id: i32,
    #[serde(default)]
    #[validate(max_length = 5000)]
    pub content: String,
    /// Locations returned by the file storage service
    #[serde(default)]
    #[validate(max_items = 10)]
    pub file_paths: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct MarkRead {
    #[validate(minimum = 1)]
    pub user_id: i32,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct MessagesQuery {
    #[validate(minimum = 1)]
    pub user_id: i32,
    #[serde(default)]
    pub order: MessageOrder,
    #[validate(minimum = 1)]
    #[validate(maximum = 500)]
    pub limit: Option<i64>,
}
