//! Session store contract and its implementations

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewSession, PublishedSession, Session, SessionPatch};

pub mod session;

#[cfg(test)]
pub mod memory;

pub use session::SessionRepository;

/// Persistence for session documents
///
/// Every mutation is scoped by owner: a session that exists but belongs to
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// All published sessions with their owner view, newest first
    async fn list_published(&self) -> DatabaseResult<Vec<PublishedSession>>;

    /// Every session of one owner, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Session>>;

    /// Persist a new session
    async fn create(&self, new_session: &NewSession) -> DatabaseResult<Session>;

    /// Whether `session_id` exists and belongs to `owner_id`
    async fn is_owned_by(&self, owner_id: Uuid, session_id: Uuid) -> DatabaseResult<bool>;

    /// Apply a patch if `session_id` exists and belongs to `owner_id`
    async fn update_owned(
        &self,
        owner_id: Uuid,
        session_id: Uuid,
        patch: &SessionPatch,
    ) -> DatabaseResult<Option<Session>>;

    /// Delete if `session_id` exists and belongs to `owner_id`
    async fn delete_owned(&self, owner_id: Uuid, session_id: Uuid) -> DatabaseResult<bool>;
}
