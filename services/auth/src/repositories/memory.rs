//! In-memory credential store for tests

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::CredentialStore;
use crate::models::{NewUser, User};

/// Keeps users in a map keyed by email, with the same uniqueness rule as
/// the `users_email_key` index.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn get(&self, email: &str) -> Option<User> {
        self.users.lock().await.get(email).cloned()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        Ok(self.users.lock().await.get(email).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut users = self.users.lock().await;

        if users.contains_key(&new_user.email) {
            return Err(DatabaseError::UniqueViolation {
                constraint: Some("users_email_key".to_string()),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.email.clone(), user.clone());

        Ok(user)
    }
}
