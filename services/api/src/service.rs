//! Ownership-scoped session operations

use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{CreateSessionRequest, PublishedSession, Session, UpdateSessionRequest},
    repositories::SessionStore,
};
use common::error::DatabaseError;

/// Session resource service
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

/// Ids that do not parse cannot name an existing session
fn parse_session_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn store_error(operation: &str, err: DatabaseError) -> ApiError {
    match err {
        // The token outlived its user
        DatabaseError::ForeignKeyViolation { .. } => ApiError::Unauthorized,
        DatabaseError::CheckViolation { .. } => ApiError::Database(err),
        other => {
            error!("Failed to {}: {}", operation, other);
            ApiError::InternalServerError
        }
    }
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Every published session, newest first
    pub async fn list_published(&self) -> ApiResult<Vec<PublishedSession>> {
        self.store
            .list_published()
            .await
            .map_err(|e| store_error("list published sessions", e))
    }

    /// The caller's drafts and published sessions, newest first
    pub async fn list_mine(&self, owner_id: Uuid) -> ApiResult<Vec<Session>> {
        self.store
            .list_by_owner(owner_id)
            .await
            .map_err(|e| store_error("list sessions", e))
    }

    /// Create a session owned by the caller
    pub async fn create(&self, owner_id: Uuid, request: CreateSessionRequest) -> ApiResult<Session> {
        let new_session = request
            .into_new_session(owner_id)
            .map_err(ApiError::BadRequest)?;

        let session = self
            .store
            .create(&new_session)
            .await
            .map_err(|e| store_error("create session", e))?;

        info!(user_id = %owner_id, session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Update a session the caller owns
    pub async fn update(
        &self,
        owner_id: Uuid,
        session_id: &str,
        request: UpdateSessionRequest,
    ) -> ApiResult<Session> {
        let session_id = parse_session_id(session_id)?;
        let patch = match request.into_patch() {
            Ok(patch) => patch,
            Err(message) => {
                // Only the owner learns what was wrong with the body
                self.ensure_owned(owner_id, session_id).await?;
                return Err(ApiError::BadRequest(message));
            }
        };

        let session = self
            .store
            .update_owned(owner_id, session_id, &patch)
            .await
            .map_err(|e| store_error("update session", e))?
            .ok_or(ApiError::NotFound)?;

        info!(user_id = %owner_id, session_id = %session.id, "Session updated");
        Ok(session)
    }

    /// `NotFound` unless the caller owns the session named by `session_id`
    pub async fn require_owned(&self, owner_id: Uuid, session_id: &str) -> ApiResult<()> {
        let session_id = parse_session_id(session_id)?;
        self.ensure_owned(owner_id, session_id).await
    }

    async fn ensure_owned(&self, owner_id: Uuid, session_id: Uuid) -> ApiResult<()> {
        let owned = self
            .store
            .is_owned_by(owner_id, session_id)
            .await
            .map_err(|e| store_error("look up session", e))?;

        if owned { Ok(()) } else { Err(ApiError::NotFound) }
    }

    /// Delete a session the caller owns
    pub async fn delete(&self, owner_id: Uuid, session_id: &str) -> ApiResult<()> {
        let session_id = parse_session_id(session_id)?;

        let deleted = self
            .store
            .delete_owned(owner_id, session_id)
            .await
            .map_err(|e| store_error("delete session", e))?;

        if !deleted {
            return Err(ApiError::NotFound);
        }

        info!(user_id = %owner_id, session_id = %session_id, "Session deleted");
        Ok(())
    }
}
