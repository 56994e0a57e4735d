use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "UPPERCASE", type_name = "varchar")]
#[serde(rename_all = "UPPERCASE")]
pub enum ConversationType {
    Direct, // exactly two participants
    Group,  // one or more, optionally scoped to a class
}

impl std::fmt::Display for ConversationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationType::Direct => write!(f, "DIRECT"),
            ConversationType::Group => write!(f, "GROUP"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: i32,
    pub conversation_type: ConversationType,
    pub name: Option<String>,
    pub class_id: Option<i32>,
    pub direct_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Key identifying the DIRECT conversation of a user pair, independent of order.
    pub fn direct_key(user_a: i32, user_b: i32) -> String {
        let (low, high) = if user_a <= user_b {
            (user_a, user_b)
        } else {
            (user_b, user_a)
        };
        format!("{}:{}", low, high)
    }

    pub fn is_direct(&self) -> bool {
        self.conversation_type == ConversationType::Direct
    }
}

/// Insert payload; participants are created together with the row.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub conversation_type: ConversationType,
    pub name: Option<String>,
    pub class_id: Option<i32>,
    pub participant_ids: Vec<i32>,
}

impl NewConversation {
    pub fn direct(user_a: i32, user_b: i32) -> Self {
        Self {
            conversation_type: ConversationType::Direct,
            name: None,
            class_id: None,
            participant_ids: vec![user_a, user_b],
        }
    }

    pub fn group(name: String, class_id: Option<i32>, participant_ids: Vec<i32>) -> Self {
        Self {
            conversation_type: ConversationType::Group,
            name: Some(name),
            class_id,
            participant_ids,
        }
    }

    pub fn direct_key(&self) -> Option<String> {
        match (self.conversation_type, self.participant_ids.as_slice()) {
            (ConversationType::Direct, [a, b]) => Some(Conversation::direct_key(*a, *b)),
            _ => None,
        }
    }
}
