use super::errors::ConnectorError;
use super::{ClassDirectory, UserDirectory};
use crate::models::{Class, User};
use chrono::Utc;
use std::collections::HashMap;

/// Fixed set of users, for tests
#[derive(Default)]
pub struct MockUserDirectory {
    users: HashMap<i32, User>,
}

impl MockUserDirectory {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
        }
    }

    /// `user{id}` / `User {id}` accounts for every id.
    pub fn with_ids(ids: impl IntoIterator<Item = i32>) -> Self {
        Self::with_users(
            ids.into_iter()
                .map(|id| User {
                    id,
                    username: format!("user{}", id),
                    full_name: Some(format!("User {}", id)),
                    role: "STUDENT".to_string(),
                    created_at: Utc::now(),
                })
                .collect(),
        )
    }
}

#[async_trait::async_trait]
impl UserDirectory for MockUserDirectory {
    async fn fetch(&self, id: i32) -> Result<Option<User>, ConnectorError> {
        Ok(self.users.get(&id).cloned())
    }

    async fn fetch_by_username(&self, username: &str) -> Result<Option<User>, ConnectorError> {
        Ok(self
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }
}

/// Classes with their enrolled students, for tests
#[derive(Default)]
pub struct MockClassDirectory {
    classes: HashMap<i32, (Class, Vec<i32>)>,
}

impl MockClassDirectory {
    pub fn with_class(mut self, id: i32, name: &str, teacher_id: i32, students: Vec<i32>) -> Self {
        let class = Class {
            id,
            name: name.to_string(),
            teacher_id,
            created_at: Utc::now(),
        };
        self.classes.insert(id, (class, students));
        self
    }
}

#[async_trait::async_trait]
impl ClassDirectory for MockClassDirectory {
    async fn fetch(&self, id: i32) -> Result<Option<Class>, ConnectorError> {
        Ok(self.classes.get(&id).map(|(class, _)| class.clone()))
    }

    async fn student_ids(&self, class_id: i32) -> Result<Vec<i32>, ConnectorError> {
        Ok(self
            .classes
            .get(&class_id)
            .map(|(_, students)| students.clone())
            .unwrap_or_default())
    }
}
