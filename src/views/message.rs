use crate::connectors::FileStorage;
use crate::models;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentView {
    pub name: String,
    pub path: String,
    pub url: String,
}

impl AttachmentView {
    /// One entry per stored path, in stored order.
    pub fn from_message(message: &models::Message, files: &dyn FileStorage) -> Vec<Self> {
        message
            .attachment_paths()
            .into_iter()
            .map(|path| Self {
                name: files.file_name(path),
                path: path.to_string(),
                url: files.download_url(path),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub sender_name: String,
    pub content: String,
    pub attachments: Vec<AttachmentView>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

impl MessageView {
    pub fn project(message: models::Message, sender_name: String, files: &dyn FileStorage) -> Self {
        let attachments = AttachmentView::from_message(&message, files);

        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            sender_name,
            content: message.content,
            attachments,
            created_at: message.created_at,
            read: message.read_at.is_some(),
            read_at: message.read_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::FileSettings;
    use crate::connectors::LinkFileStorage;

    fn message(file_paths: Option<&str>) -> models::Message {
        models::Message {
            id: 5,
            conversation_id: 10,
            sender_id: 1,
            content: "see attached".to_string(),
            file_paths: file_paths.map(str::to_string),
            created_at: Utc::now(),
            read_at: None,
        }
    }

    fn files() -> LinkFileStorage {
        LinkFileStorage::new(&FileSettings {
            download_base_url: "http://lms.local/files".to_string(),
        })
    }

    #[test]
    fn attachments_keep_stored_order() {
        let view = MessageView::project(
            message(Some("a/b/x.pdf,c/y.png")),
            "Ada".to_string(),
            &files(),
        );

        let names: Vec<&str> = view.attachments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["x.pdf", "y.png"]);
        assert_eq!(view.attachments[0].path, "a/b/x.pdf");
        assert_eq!(view.attachments[1].url, "http://lms.local/files?path=c%2Fy.png");
        assert!(!view.read);
        assert_eq!(view.sender_name, "Ada");
    }

    #[test]
    fn message_without_files_has_no_attachments() {
        let view = MessageView::project(message(None), "Ada".to_string(), &files());
        assert!(view.attachments.is_empty());

        let view = MessageView::project(message(Some("")), "Ada".to_string(), &files());
        assert!(view.attachments.is_empty());
    }
}
