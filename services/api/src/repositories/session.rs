//! PostgreSQL-backed session store

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::SessionStore;
use crate::models::{
    NewSession, OwnerView, PublishedSession, Session, SessionPatch, SessionStatus,
};

const SESSION_COLUMNS: &str = "id, user_id, title, description, video_url, tags, status, \
     image_url, likes, created_at, updated_at";

/// Session repository for database operations
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn session_from_row(row: &PgRow) -> DatabaseResult<Session> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<SessionStatus>()
        .map_err(|e| DatabaseError::Query(sqlx::Error::Decode(e.into())))?;

    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        video_url: row.try_get("video_url")?,
        tags: row.try_get("tags")?,
        status,
        image_url: row.try_get("image_url")?,
        likes: row.try_get("likes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn list_published(&self) -> DatabaseResult<Vec<PublishedSession>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.user_id, s.title, s.description, s.video_url, s.tags, s.status,
                   s.image_url, s.likes, s.created_at, s.updated_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.status = 'published'
            ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> DatabaseResult<PublishedSession> {
                let session = session_from_row(row)?;
                let owner = OwnerView {
                    id: session.user_id,
                    name: row.try_get("owner_name")?,
                    email: row.try_get("owner_email")?,
                };
                Ok(session.with_owner(owner))
            })
            .collect()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Session>> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(session_from_row).collect()
    }

    async fn create(&self, new_session: &NewSession) -> DatabaseResult<Session> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO sessions
                (user_id, title, description, video_url, tags, status, image_url, likes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(new_session.user_id)
        .bind(&new_session.title)
        .bind(&new_session.description)
        .bind(&new_session.video_url)
        .bind(&new_session.tags)
        .bind(new_session.status.as_str())
        .bind(&new_session.image_url)
        .bind(new_session.likes)
        .fetch_one(&self.pool)
        .await?;

        session_from_row(&row)
    }

    async fn is_owned_by(&self, owner_id: Uuid, session_id: Uuid) -> DatabaseResult<bool> {
        let row = sqlx::query(
            r#"
            SELECT 1 FROM sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        session_id: Uuid,
        patch: &SessionPatch,
    ) -> DatabaseResult<Option<Session>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE sessions SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                video_url = COALESCE($5, video_url),
                tags = COALESCE($6, tags),
                status = COALESCE($7, status),
                image_url = COALESCE($8, image_url),
                likes = COALESCE($9, likes),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(owner_id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.video_url.as_deref())
        .bind(patch.tags.as_ref())
        .bind(patch.status.map(|status| status.as_str()))
        .bind(patch.image_url.as_deref())
        .bind(patch.likes)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(session_from_row).transpose()
    }

    async fn delete_owned(&self, owner_id: Uuid, session_id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
