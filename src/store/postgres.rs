use super::{ConversationStore, Removal, Result};
use crate::db;
use crate::models::{Conversation, Message, MessageOrder, NewConversation, NewMessage, Participant};
use sqlx::PgPool;

pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConversationStore for PgConversationStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn fetch(&self, id: i32) -> Result<Option<Conversation>> {
        Ok(db::conversation::fetch(&self.pool, id).await?)
    }

    async fn fetch_direct(&self, user_a: i32, user_b: i32) -> Result<Option<Conversation>> {
        let key = Conversation::direct_key(user_a, user_b);
        Ok(db::conversation::fetch_by_direct_key(&self.pool, &key).await?)
    }

    async fn fetch_by_user(&self, user_id: i32) -> Result<Vec<Conversation>> {
        Ok(db::conversation::fetch_by_user(&self.pool, user_id).await?)
    }

    #[tracing::instrument(name = "Create conversation.", skip(self))]
    async fn create(&self, conversation: NewConversation) -> Result<Conversation> {
        let mut tx = self.pool.begin().await?;

        let created = match db::conversation::insert(&mut *tx, &conversation).await? {
            Some(created) => created,
            None => {
                // lost the race for this pair: hand back the winner's row
                tx.rollback().await?;
                let key = conversation.direct_key().unwrap_or_default();
                return db::conversation::fetch_by_direct_key(&self.pool, &key)
                    .await?
                    .ok_or_else(|| {
                        super::StoreError::Database(format!(
                            "direct conversation {} vanished after conflict",
                            key
                        ))
                    });
            }
        };

        for user_id in &conversation.participant_ids {
            db::participant::insert(&mut *tx, created.id, *user_id).await?;
        }
        tx.commit().await?;

        tracing::info!(
            "Conversation {} ({}) created with {} participants",
            created.id,
            created.conversation_type,
            conversation.participant_ids.len()
        );
        Ok(created)
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        Ok(db::conversation::delete(&self.pool, id).await?)
    }

    async fn participants(&self, conversation_id: i32) -> Result<Vec<Participant>> {
        Ok(db::participant::fetch_by_conversation(&self.pool, conversation_id).await?)
    }

    async fn add_participant(&self, conversation_id: i32, user_id: i32) -> Result<Participant> {
        Ok(db::participant::insert(&self.pool, conversation_id, user_id).await?)
    }

    #[tracing::instrument(name = "Remove participant.", skip(self))]
    async fn remove_participant(&self, conversation_id: i32, user_id: i32) -> Result<Removal> {
        let mut tx = self.pool.begin().await?;

        if !db::conversation::lock(&mut *tx, conversation_id).await? {
            tx.rollback().await?;
            return Ok(Removal::NotParticipant);
        }

        let participants = db::participant::fetch_by_conversation(&mut *tx, conversation_id).await?;
        let outcome = if !participants.iter().any(|p| p.user_id == user_id) {
            Removal::NotParticipant
        } else if participants.len() == 1 {
            Removal::LastParticipant
        } else {
            db::participant::delete(&mut *tx, conversation_id, user_id).await?;
            Removal::Removed
        };
        tx.commit().await?;

        Ok(outcome)
    }

    #[tracing::instrument(name = "Append message.", skip(self, message), fields(conversation_id = message.conversation_id, sender_id = message.sender_id))]
    async fn append_message(&self, message: NewMessage) -> Result<Option<Message>> {
        let mut tx = self.pool.begin().await?;

        // the row lock taken here orders concurrent sends to one conversation
        let Some(sent_at) = db::conversation::touch(&mut *tx, message.conversation_id).await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let stored = db::message::insert(&mut *tx, &message, sent_at).await?;
        let bumped =
            db::participant::increment_unread(&mut *tx, message.conversation_id, message.sender_id)
                .await?;
        tx.commit().await?;

        tracing::info!(
            "Message {} stored, {} unread counters incremented",
            stored.id,
            bumped
        );
        Ok(Some(stored))
    }

    async fn messages(
        &self,
        conversation_id: i32,
        order: MessageOrder,
        limit: Option<i64>,
    ) -> Result<Vec<Message>> {
        Ok(db::message::fetch_by_conversation(&self.pool, conversation_id, order, limit).await?)
    }

    async fn mark_read(&self, conversation_id: i32, reader_id: i32) -> Result<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        if !db::participant::reset_unread(&mut *tx, conversation_id, reader_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }
        let stamped = db::message::mark_read(&mut *tx, conversation_id, reader_id).await?;
        tx.commit().await?;

        Ok(Some(stamped))
    }

    async fn unread_total(&self, user_id: i32) -> Result<i64> {
        Ok(db::participant::unread_total(&self.pool, user_id).await?)
    }
}
