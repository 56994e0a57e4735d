//! Conversation persistence.
//!
//! The messaging service only talks to [`ConversationStore`]. `PgConversationStore`
//! is what the server runs with; `InMemoryConversationStore` backs the tests.

mod memory;
mod postgres;

pub use memory::InMemoryConversationStore;
pub use postgres::PgConversationStore;

use crate::models::{Conversation, Message, MessageOrder, NewConversation, NewMessage, Participant};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<String> for StoreError {
    fn from(message: String) -> Self {
        Self::Database(message)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        Self::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcome of removing a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// The user was not in the conversation (or the conversation is gone).
    NotParticipant,
    /// Refused: the conversation would be left without participants.
    LastParticipant,
}

#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync {
    /// Cheap round trip used by the health report.
    async fn ping(&self) -> Result<()>;

    async fn fetch(&self, id: i32) -> Result<Option<Conversation>>;

    async fn fetch_direct(&self, user_a: i32, user_b: i32) -> Result<Option<Conversation>>;

    /// Conversations the user participates in, most recently updated first.
    async fn fetch_by_user(&self, user_id: i32) -> Result<Vec<Conversation>>;

    /// Creates the conversation with its participants. For DIRECT conversations
    /// an existing row for the same pair is returned instead of a duplicate.
    async fn create(&self, conversation: NewConversation) -> Result<Conversation>;

    /// Deletes the conversation together with its participants and messages.
    async fn delete(&self, id: i32) -> Result<bool>;

    async fn participants(&self, conversation_id: i32) -> Result<Vec<Participant>>;

    async fn add_participant(&self, conversation_id: i32, user_id: i32) -> Result<Participant>;

    /// Removes the user unless they are the last participant. The roster is
    /// counted under the conversation lock, so concurrent removals cannot
    /// empty a conversation.
    async fn remove_participant(&self, conversation_id: i32, user_id: i32) -> Result<Removal>;

    /// Persists the message, refreshes `updated_at` and bumps every other
    /// participant's unread counter as one unit. `None` when the conversation
    /// does not exist, in which case nothing is written.
    async fn append_message(&self, message: NewMessage) -> Result<Option<Message>>;

    async fn messages(
        &self,
        conversation_id: i32,
        order: MessageOrder,
        limit: Option<i64>,
    ) -> Result<Vec<Message>>;

    /// Resets the reader's counter and stamps `read_at` on messages from others.
    /// `None` when the reader is not a participant.
    async fn mark_read(&self, conversation_id: i32, reader_id: i32) -> Result<Option<u64>>;

    async fn unread_total(&self, user_id: i32) -> Result<i64>;
}
