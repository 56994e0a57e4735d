use super::{ConversationStore, Removal, Result};
use crate::models::{
    Conversation, Message, MessageOrder, NewConversation, NewMessage, Participant,
};
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    conversations: Vec<Conversation>,
    participants: Vec<Participant>,
    messages: Vec<Message>,
    next_conversation_id: i32,
    next_participant_id: i32,
    next_message_id: i32,
}

impl State {
    fn conversation_mut(&mut self, id: i32) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    fn insert_participant(&mut self, conversation_id: i32, user_id: i32) -> Participant {
        if let Some(existing) = self
            .participants
            .iter()
            .find(|p| p.conversation_id == conversation_id && p.user_id == user_id)
        {
            return existing.clone();
        }

        self.next_participant_id += 1;
        let participant = Participant {
            id: self.next_participant_id,
            conversation_id,
            user_id,
            unread_count: 0,
            joined_at: Utc::now(),
        };
        self.participants.push(participant.clone());
        participant
    }
}

/// Process-local store with the same semantics as the postgres one; every
/// operation holds the write lock for its whole duration.
#[derive(Default)]
pub struct InMemoryConversationStore {
    state: RwLock<State>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a conversation with a fixed id, for fixtures.
    pub async fn insert_with_id(&self, id: i32, conversation: NewConversation) -> Conversation {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let created = Conversation {
            id,
            conversation_type: conversation.conversation_type,
            name: conversation.name.clone(),
            class_id: conversation.class_id,
            direct_key: conversation.direct_key(),
            created_at: now,
            updated_at: now,
        };
        state.next_conversation_id = state.next_conversation_id.max(id);
        state.conversations.push(created.clone());
        for user_id in &conversation.participant_ids {
            state.insert_participant(id, *user_id);
        }
        created
    }
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch(&self, id: i32) -> Result<Option<Conversation>> {
        let state = self.state.read().await;
        Ok(state.conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn fetch_direct(&self, user_a: i32, user_b: i32) -> Result<Option<Conversation>> {
        let key = Conversation::direct_key(user_a, user_b);
        let state = self.state.read().await;
        Ok(state
            .conversations
            .iter()
            .find(|c| c.direct_key.as_deref() == Some(key.as_str()))
            .cloned())
    }

    async fn fetch_by_user(&self, user_id: i32) -> Result<Vec<Conversation>> {
        let state = self.state.read().await;
        let mut conversations: Vec<Conversation> = state
            .conversations
            .iter()
            .filter(|c| {
                state
                    .participants
                    .iter()
                    .any(|p| p.conversation_id == c.id && p.user_id == user_id)
            })
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(conversations)
    }

    async fn create(&self, conversation: NewConversation) -> Result<Conversation> {
        let mut state = self.state.write().await;

        let direct_key = conversation.direct_key();
        if let Some(key) = direct_key.as_deref() {
            if let Some(existing) = state
                .conversations
                .iter()
                .find(|c| c.direct_key.as_deref() == Some(key))
            {
                return Ok(existing.clone());
            }
        }

        state.next_conversation_id += 1;
        let now = Utc::now();
        let created = Conversation {
            id: state.next_conversation_id,
            conversation_type: conversation.conversation_type,
            name: conversation.name,
            class_id: conversation.class_id,
            direct_key,
            created_at: now,
            updated_at: now,
        };
        state.conversations.push(created.clone());
        for user_id in &conversation.participant_ids {
            state.insert_participant(created.id, *user_id);
        }

        Ok(created)
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.conversations.len();
        state.conversations.retain(|c| c.id != id);
        if state.conversations.len() == before {
            return Ok(false);
        }
        state.participants.retain(|p| p.conversation_id != id);
        state.messages.retain(|m| m.conversation_id != id);
        Ok(true)
    }

    async fn participants(&self, conversation_id: i32) -> Result<Vec<Participant>> {
        let state = self.state.read().await;
        Ok(state
            .participants
            .iter()
            .filter(|p| p.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn add_participant(&self, conversation_id: i32, user_id: i32) -> Result<Participant> {
        let mut state = self.state.write().await;
        Ok(state.insert_participant(conversation_id, user_id))
    }

    async fn remove_participant(&self, conversation_id: i32, user_id: i32) -> Result<Removal> {
        let mut state = self.state.write().await;
        let roster: Vec<i32> = state
            .participants
            .iter()
            .filter(|p| p.conversation_id == conversation_id)
            .map(|p| p.user_id)
            .collect();

        if !roster.contains(&user_id) {
            return Ok(Removal::NotParticipant);
        }
        if roster.len() == 1 {
            return Ok(Removal::LastParticipant);
        }
        state
            .participants
            .retain(|p| !(p.conversation_id == conversation_id && p.user_id == user_id));
        Ok(Removal::Removed)
    }

    async fn append_message(&self, message: NewMessage) -> Result<Option<Message>> {
        let mut state = self.state.write().await;

        let now = match state.conversation_mut(message.conversation_id) {
            Some(conversation) => {
                conversation.updated_at = conversation.updated_at.max(Utc::now());
                conversation.updated_at
            }
            None => return Ok(None),
        };

        state.next_message_id += 1;
        let stored = Message {
            id: state.next_message_id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            file_paths: message.joined_file_paths(),
            created_at: now,
            read_at: None,
        };
        state.messages.push(stored.clone());

        for participant in state.participants.iter_mut().filter(|p| {
            p.conversation_id == message.conversation_id && p.user_id != message.sender_id
        }) {
            participant.unread_count += 1;
        }

        Ok(Some(stored))
    }

    async fn messages(
        &self,
        conversation_id: i32,
        order: MessageOrder,
        limit: Option<i64>,
    ) -> Result<Vec<Message>> {
        let state = self.state.read().await;
        let mut messages: Vec<Message> = state
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();

        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if order == MessageOrder::Desc {
            messages.reverse();
        }
        if let Some(limit) = limit {
            messages.truncate(limit.max(0) as usize);
        }
        Ok(messages)
    }

    async fn mark_read(&self, conversation_id: i32, reader_id: i32) -> Result<Option<u64>> {
        let mut state = self.state.write().await;

        match state
            .participants
            .iter_mut()
            .find(|p| p.conversation_id == conversation_id && p.user_id == reader_id)
        {
            Some(participant) => participant.unread_count = 0,
            None => return Ok(None),
        }

        let now = Utc::now();
        let mut stamped = 0;
        for message in state.messages.iter_mut().filter(|m| {
            m.conversation_id == conversation_id && m.sender_id != reader_id && m.read_at.is_none()
        }) {
            message.read_at = Some(now);
            stamped += 1;
        }
        Ok(Some(stamped))
    }

    async fn unread_total(&self, user_id: i32) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state
            .participants
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.unread_count as i64)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationType;

    #[tokio::test]
    async fn deleting_a_conversation_drops_its_rows() {
        let store = InMemoryConversationStore::new();
        let conversation = store
            .create(NewConversation::group("Lab".to_string(), None, vec![1, 2]))
            .await
            .unwrap();
        store
            .append_message(NewMessage {
                conversation_id: conversation.id,
                sender_id: 1,
                content: "hi".to_string(),
                file_paths: vec![],
            })
            .await
            .unwrap();

        assert!(store.delete(conversation.id).await.unwrap());
        assert!(store.participants(conversation.id).await.unwrap().is_empty());
        assert!(store
            .messages(conversation.id, MessageOrder::Asc, None)
            .await
            .unwrap()
            .is_empty());
        assert!(!store.delete(conversation.id).await.unwrap());
    }

    #[tokio::test]
    async fn direct_conversations_are_unique_per_pair() {
        let store = InMemoryConversationStore::new();
        let first = store.create(NewConversation::direct(3, 8)).await.unwrap();
        let second = store.create(NewConversation::direct(8, 3)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.conversation_type, ConversationType::Direct);
        assert_eq!(store.participants(first.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn concurrent_removals_keep_one_participant() {
        let store = std::sync::Arc::new(InMemoryConversationStore::new());
        let conversation = store
            .create(NewConversation::group("Pair".to_string(), None, vec![1, 2]))
            .await
            .unwrap();
        let id = conversation.id;

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.remove_participant(id, 1).await.unwrap() }
        });
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.remove_participant(id, 2).await.unwrap() }
        });
        let mut outcomes = vec![first.await.unwrap(), second.await.unwrap()];
        outcomes.sort_by_key(|outcome| *outcome == Removal::Removed);

        assert_eq!(outcomes, vec![Removal::LastParticipant, Removal::Removed]);
        assert_eq!(store.participants(conversation.id).await.unwrap().len(), 1);
        assert_eq!(
            store.remove_participant(conversation.id, 9).await.unwrap(),
            Removal::NotParticipant
        );
    }
}
