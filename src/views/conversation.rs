use super::MessageView;
use crate::models;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub user_id: i32,
    pub name: String,
    pub unread_count: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub id: i32,
    #[serde(rename = "type")]
    pub conversation_type: models::ConversationType,
    pub name: Option<String>,
    /// Group name, or the other participant's name for DIRECT conversations.
    pub title: String,
    pub class_id: Option<i32>,
    pub participants: Vec<ParticipantView>,
    /// Unread count of the user the view was built for.
    pub unread_count: i32,
    pub last_message: Option<MessageView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationView {
    pub fn project(
        conversation: models::Conversation,
        viewer_id: i32,
        participants: Vec<ParticipantView>,
        last_message: Option<MessageView>,
    ) -> Self {
        let unread_count = participants
            .iter()
            .find(|p| p.user_id == viewer_id)
            .map(|p| p.unread_count)
            .unwrap_or_default();

        let title = match (&conversation.name, conversation.conversation_type) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, models::ConversationType::Direct) => participants
                .iter()
                .find(|p| p.user_id != viewer_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            _ => participants
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };

        Self {
            id: conversation.id,
            conversation_type: conversation.conversation_type,
            name: conversation.name,
            title,
            class_id: conversation.class_id,
            participants,
            unread_count,
            last_message,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadView {
    pub user_id: i32,
    pub unread_count: i64,
}
