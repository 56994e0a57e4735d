mod conversation;
mod message;

pub use conversation::{ConversationView, ParticipantView, UnreadView};
pub use message::{AttachmentView, MessageView};
