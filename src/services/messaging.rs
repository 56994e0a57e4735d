//! Messaging Service - conversations, messages and unread bookkeeping
//!
//! Orchestrates the conversation store and the directories. Every check that
//! can reject a request runs before anything is written.

use crate::connectors::{ClassDirectory, ConnectorError, FileStorage, UserDirectory};
use crate::helpers::JsonResponse;
use crate::models::{
    Conversation, MessageOrder, NewConversation, NewMessage, Participant, User,
};
use crate::store::{ConversationStore, Removal, StoreError};
use crate::views::{ConversationView, MessageView, ParticipantView};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::collections::HashMap;
use std::sync::Arc;

/// Result type for messaging operations
pub type Result<T> = std::result::Result<T, MessagingError>;

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for MessagingError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ConnectorError> for MessagingError {
    fn from(err: ConnectorError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl ResponseError for MessagingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Internal(details) => {
                tracing::error!("Messaging request failed: {}", details);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code())
            .json(JsonResponse::<()>::build().to_json_response(message))
    }
}

/// Display names resolved during one request.
type NameCache = HashMap<i32, String>;

const UNKNOWN_USER: &str = "Unknown user";

pub struct MessagingService {
    store: Arc<dyn ConversationStore>,
    users: Arc<dyn UserDirectory>,
    classes: Arc<dyn ClassDirectory>,
    files: Arc<dyn FileStorage>,
}

impl MessagingService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        users: Arc<dyn UserDirectory>,
        classes: Arc<dyn ClassDirectory>,
        files: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            store,
            users,
            classes,
            files,
        }
    }

    /// Returns the DIRECT conversation between the two users, creating it on first use.
    #[tracing::instrument(name = "Open direct conversation.", skip(self))]
    pub async fn open_direct(&self, user_id: i32, other_user_id: i32) -> Result<ConversationView> {
        if user_id == other_user_id {
            return Err(MessagingError::Validation(
                "A direct conversation needs two different users".to_string(),
            ));
        }
        self.require_user(user_id).await?;
        self.require_user(other_user_id).await?;

        let conversation = match self.store.fetch_direct(user_id, other_user_id).await? {
            Some(existing) => {
                tracing::debug!("Reusing direct conversation {}", existing.id);
                existing
            }
            None => {
                self.store
                    .create(NewConversation::direct(user_id, other_user_id))
                    .await?
            }
        };

        let participants = self.store.participants(conversation.id).await?;
        self.conversation_view(conversation, user_id, participants, &mut NameCache::new())
            .await
    }

    pub async fn open_direct_with_username(
        &self,
        user_id: i32,
        other_username: &str,
    ) -> Result<ConversationView> {
        let other = self
            .users
            .fetch_by_username(other_username)
            .await?
            .ok_or_else(|| MessagingError::NotFound(format!("User {} not found", other_username)))?;

        self.open_direct(user_id, other.id).await
    }

    /// The creator is always a participant; duplicate ids collapse.
    #[tracing::instrument(name = "Create group conversation.", skip(self))]
    pub async fn create_group(
        &self,
        creator_id: i32,
        name: &str,
        participant_ids: &[i32],
    ) -> Result<ConversationView> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MessagingError::Validation(
                "Group name is required".to_string(),
            ));
        }

        let members = unique_members(creator_id, participant_ids);
        for user_id in &members {
            self.require_user(*user_id).await?;
        }

        let conversation = self
            .store
            .create(NewConversation::group(name.to_string(), None, members))
            .await?;

        let participants = self.store.participants(conversation.id).await?;
        self.conversation_view(conversation, creator_id, participants, &mut NameCache::new())
            .await
    }

    /// Group made of the class teacher and every enrolled student.
    #[tracing::instrument(name = "Create class conversation.", skip(self))]
    pub async fn create_class_group(
        &self,
        creator_id: i32,
        class_id: i32,
        name: Option<&str>,
    ) -> Result<ConversationView> {
        self.require_user(creator_id).await?;
        let class = self
            .classes
            .fetch(class_id)
            .await?
            .ok_or_else(|| MessagingError::NotFound(format!("Class {} not found", class_id)))?;
        let students = self.classes.student_ids(class_id).await?;

        if creator_id != class.teacher_id && !students.contains(&creator_id) {
            return Err(MessagingError::Unauthorized(format!(
                "User {} is not a member of class {}",
                creator_id, class_id
            )));
        }

        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => class.name.clone(),
        };
        let members = unique_members(class.teacher_id, &students);

        let conversation = self
            .store
            .create(NewConversation::group(name, Some(class.id), members))
            .await?;

        let participants = self.store.participants(conversation.id).await?;
        self.conversation_view(conversation, creator_id, participants, &mut NameCache::new())
            .await
    }

    pub async fn conversation(&self, conversation_id: i32, viewer_id: i32) -> Result<ConversationView> {
        let conversation = self.require_conversation(conversation_id).await?;
        let participants = self.require_participant(conversation_id, viewer_id).await?;

        self.conversation_view(conversation, viewer_id, participants, &mut NameCache::new())
            .await
    }

    /// Inbox: most recently active first, each with the viewer's unread count.
    #[tracing::instrument(name = "List user conversations.", skip(self))]
    pub async fn conversations_for_user(&self, user_id: i32) -> Result<Vec<ConversationView>> {
        self.require_user(user_id).await?;

        let mut names = NameCache::new();
        let mut views = vec![];
        for conversation in self.store.fetch_by_user(user_id).await? {
            let participants = self.store.participants(conversation.id).await?;
            views.push(
                self.conversation_view(conversation, user_id, participants, &mut names)
                    .await?,
            );
        }

        Ok(views)
    }

    #[tracing::instrument(name = "Add conversation participant.", skip(self))]
    pub async fn add_participant(
        &self,
        conversation_id: i32,
        actor_id: i32,
        user_id: i32,
    ) -> Result<ConversationView> {
        let conversation = self.require_group(conversation_id).await?;
        self.require_participant(conversation_id, actor_id).await?;
        self.require_user(user_id).await?;

        self.store.add_participant(conversation_id, user_id).await?;

        let participants = self.store.participants(conversation_id).await?;
        self.conversation_view(conversation, actor_id, participants, &mut NameCache::new())
            .await
    }

    #[tracing::instrument(name = "Remove conversation participant.", skip(self))]
    pub async fn remove_participant(
        &self,
        conversation_id: i32,
        actor_id: i32,
        user_id: i32,
    ) -> Result<()> {
        self.require_group(conversation_id).await?;
        self.require_participant(conversation_id, actor_id).await?;

        match self.store.remove_participant(conversation_id, user_id).await? {
            Removal::Removed => Ok(()),
            Removal::NotParticipant => Err(MessagingError::NotFound(format!(
                "User {} is not in conversation {}",
                user_id, conversation_id
            ))),
            Removal::LastParticipant => Err(MessagingError::Validation(
                "A group conversation must keep at least one participant".to_string(),
            )),
        }
    }

    #[tracing::instrument(name = "Delete conversation.", skip(self))]
    pub async fn delete_conversation(&self, conversation_id: i32, actor_id: i32) -> Result<()> {
        self.require_conversation(conversation_id).await?;
        self.require_participant(conversation_id, actor_id).await?;

        if !self.store.delete(conversation_id).await? {
            return Err(conversation_not_found(conversation_id));
        }
        tracing::info!("Conversation {} deleted by user {}", conversation_id, actor_id);
        Ok(())
    }

    /// Appends a message and bumps the unread counter of everyone but the sender.
    #[tracing::instrument(name = "Send message.", skip(self, content, file_paths))]
    pub async fn send_message(
        &self,
        conversation_id: i32,
        sender_id: i32,
        content: &str,
        file_paths: &[String],
    ) -> Result<MessageView> {
        self.require_conversation(conversation_id).await?;
        let sender = self.require_user(sender_id).await?;
        self.require_participant(conversation_id, sender_id).await?;

        if file_paths.iter().any(|path| path.contains(',')) {
            return Err(MessagingError::Validation(
                "File paths must not contain commas".to_string(),
            ));
        }
        let message = NewMessage {
            conversation_id,
            sender_id,
            content: content.to_string(),
            file_paths: file_paths.to_vec(),
        };
        if content.trim().is_empty() && message.joined_file_paths().is_none() {
            return Err(MessagingError::Validation(
                "A message needs content or attachments".to_string(),
            ));
        }

        let stored = self
            .store
            .append_message(message)
            .await?
            .ok_or_else(|| conversation_not_found(conversation_id))?;

        tracing::info!(
            "User {} sent message {} to conversation {}",
            sender_id,
            stored.id,
            conversation_id
        );
        Ok(MessageView::project(
            stored,
            sender.display_name(),
            self.files.as_ref(),
        ))
    }

    /// History is oldest first; `MessageOrder::Desc` serves previews.
    pub async fn messages(
        &self,
        conversation_id: i32,
        viewer_id: i32,
        order: MessageOrder,
        limit: Option<i64>,
    ) -> Result<Vec<MessageView>> {
        self.require_conversation(conversation_id).await?;
        self.require_participant(conversation_id, viewer_id).await?;

        let mut names = NameCache::new();
        let mut views = vec![];
        for message in self.store.messages(conversation_id, order, limit).await? {
            let sender_name = self.display_name(message.sender_id, &mut names).await?;
            views.push(MessageView::project(message, sender_name, self.files.as_ref()));
        }

        Ok(views)
    }

    /// Clears the reader's unread counter; returns how many messages got stamped.
    #[tracing::instrument(name = "Mark conversation read.", skip(self))]
    pub async fn mark_read(&self, conversation_id: i32, user_id: i32) -> Result<u64> {
        self.require_conversation(conversation_id).await?;

        self.store
            .mark_read(conversation_id, user_id)
            .await?
            .ok_or_else(|| not_a_participant(conversation_id, user_id))
    }

    pub async fn unread_total(&self, user_id: i32) -> Result<i64> {
        self.require_user(user_id).await?;
        Ok(self.store.unread_total(user_id).await?)
    }

    async fn require_user(&self, id: i32) -> Result<User> {
        self.users
            .fetch(id)
            .await?
            .ok_or_else(|| MessagingError::NotFound(format!("User {} not found", id)))
    }

    async fn require_conversation(&self, id: i32) -> Result<Conversation> {
        self.store
            .fetch(id)
            .await?
            .ok_or_else(|| conversation_not_found(id))
    }

    async fn require_group(&self, id: i32) -> Result<Conversation> {
        let conversation = self.require_conversation(id).await?;
        if conversation.is_direct() {
            return Err(MessagingError::Validation(
                "Participants of a direct conversation cannot change".to_string(),
            ));
        }
        Ok(conversation)
    }

    /// Participants of the conversation, provided `user_id` is one of them.
    async fn require_participant(
        &self,
        conversation_id: i32,
        user_id: i32,
    ) -> Result<Vec<Participant>> {
        let participants = self.store.participants(conversation_id).await?;
        if participants.iter().any(|p| p.user_id == user_id) {
            Ok(participants)
        } else {
            Err(not_a_participant(conversation_id, user_id))
        }
    }

    async fn display_name(&self, user_id: i32, names: &mut NameCache) -> Result<String> {
        if let Some(name) = names.get(&user_id) {
            return Ok(name.clone());
        }

        let name = self
            .users
            .fetch(user_id)
            .await?
            .map(|user| user.display_name())
            .unwrap_or_else(|| UNKNOWN_USER.to_string());
        names.insert(user_id, name.clone());
        Ok(name)
    }

    async fn conversation_view(
        &self,
        conversation: Conversation,
        viewer_id: i32,
        participants: Vec<Participant>,
        names: &mut NameCache,
    ) -> Result<ConversationView> {
        let mut participant_views = Vec::with_capacity(participants.len());
        for participant in participants {
            participant_views.push(ParticipantView {
                user_id: participant.user_id,
                name: self.display_name(participant.user_id, names).await?,
                unread_count: participant.unread_count,
            });
        }

        let last_message = match self
            .store
            .messages(conversation.id, MessageOrder::Desc, Some(1))
            .await?
            .into_iter()
            .next()
        {
            Some(message) => {
                let sender_name = self.display_name(message.sender_id, names).await?;
                Some(MessageView::project(message, sender_name, self.files.as_ref()))
            }
            None => None,
        };

        Ok(ConversationView::project(
            conversation,
            viewer_id,
            participant_views,
            last_message,
        ))
    }
}

fn conversation_not_found(id: i32) -> MessagingError {
    MessagingError::NotFound(format!("Conversation {} not found", id))
}

fn not_a_participant(conversation_id: i32, user_id: i32) -> MessagingError {
    MessagingError::Unauthorized(format!(
        "User {} is not a participant of conversation {}",
        user_id, conversation_id
    ))
}

/// `first` followed by `others`, without duplicates, order kept.
fn unique_members(first: i32, others: &[i32]) -> Vec<i32> {
    let mut members = vec![first];
    for id in others {
        if !members.contains(id) {
            members.push(*id);
        }
    }
    members
}
