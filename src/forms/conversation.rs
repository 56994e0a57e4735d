use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// The other side may be given by id or by username.
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct OpenDirect {
    #[validate(minimum = 1)]
    pub user_id: i32,
    #[validate(minimum = 1)]
    pub other_user_id: Option<i32>,
    #[validate(min_length = 1)]
    #[validate(max_length = 100)]
    pub other_username: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct CreateGroup {
    #[validate(minimum = 1)]
    pub creator_id: i32,
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub name: String,
    #[serde(default)]
    #[validate(max_items = 500)]
    pub participant_ids: Vec<i32>,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct CreateClassGroup {
    #[validate(minimum = 1)]
    pub creator_id: i32,
    #[validate(minimum = 1)]
    pub class_id: i32,
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct AddParticipant {
    /// Participant performing the change
    #[validate(minimum = 1)]
    pub user_id: i32,
    #[validate(minimum = 1)]
    pub participant_id: i32,
}

/// `?user_id=` identifying who is asking.
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct Viewer {
    #[validate(minimum = 1)]
    pub user_id: i32,
}
