//! In-memory session store for tests

use async_trait::async_trait;
use chrono::Utc;
use common::{
    AuthUser,
    error::{DatabaseError, DatabaseResult},
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::SessionStore;
use crate::models::{
    NewSession, OwnerView, PublishedSession, Session, SessionPatch, SessionStatus,
};

#[derive(Default)]
struct Inner {
    owners: HashMap<Uuid, OwnerView>,
    // Insertion order; newest last
    sessions: Vec<Session>,
}

/// Mirrors the `sessions` table rules: owners must exist, mutations are
/// owner-scoped, listings are newest first.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `user` a valid owner, as a row in `users` would
    pub async fn add_owner(&self, user: &AuthUser) {
        self.inner.lock().await.owners.insert(
            user.id,
            OwnerView {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
            },
        );
    }

    pub async fn count(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }
}

fn newest_first(mut sessions: Vec<Session>) -> Vec<Session> {
    sessions.reverse();
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sessions
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn list_published(&self) -> DatabaseResult<Vec<PublishedSession>> {
        let inner = self.inner.lock().await;
        let published = inner
            .sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Published)
            .cloned()
            .collect();

        Ok(newest_first(published)
            .into_iter()
            .filter_map(|session| {
                let owner = inner.owners.get(&session.user_id)?.clone();
                Some(session.with_owner(owner))
            })
            .collect())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Session>> {
        let inner = self.inner.lock().await;
        let owned = inner
            .sessions
            .iter()
            .filter(|s| s.user_id == owner_id)
            .cloned()
            .collect();

        Ok(newest_first(owned))
    }

    async fn create(&self, new_session: &NewSession) -> DatabaseResult<Session> {
        let mut inner = self.inner.lock().await;

        if !inner.owners.contains_key(&new_session.user_id) {
            return Err(DatabaseError::ForeignKeyViolation {
                constraint: Some("sessions_user_id_fkey".to_string()),
            });
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id: new_session.user_id,
            title: new_session.title.clone(),
            description: new_session.description.clone(),
            video_url: new_session.video_url.clone(),
            tags: new_session.tags.clone(),
            status: new_session.status,
            image_url: new_session.image_url.clone(),
            likes: new_session.likes,
            created_at: now,
            updated_at: now,
        };
        inner.sessions.push(session.clone());

        Ok(session)
    }

    async fn is_owned_by(&self, owner_id: Uuid, session_id: Uuid) -> DatabaseResult<bool> {
        let inner = self.inner.lock().await;
        Ok(inner
            .sessions
            .iter()
            .any(|s| s.id == session_id && s.user_id == owner_id))
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        session_id: Uuid,
        patch: &SessionPatch,
    ) -> DatabaseResult<Option<Session>> {
        let mut inner = self.inner.lock().await;
        let Some(session) = inner
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id && s.user_id == owner_id)
        else {
            return Ok(None);
        };

        patch.apply_to(session);
        session.updated_at = Utc::now();

        Ok(Some(session.clone()))
    }

    async fn delete_owned(&self, owner_id: Uuid, session_id: Uuid) -> DatabaseResult<bool> {
        let mut inner = self.inner.lock().await;
        let before = inner.sessions.len();
        inner
            .sessions
            .retain(|s| !(s.id == session_id && s.user_id == owner_id));

        Ok(inner.sessions.len() < before)
    }
}
