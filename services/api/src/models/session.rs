//! Session models for the API service
//!
//! Field names on the wire follow the web client: `_id`, `youtube_url`,
//! `imageUrl`, `createdAt`, `updatedAt`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Publication state of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Draft,
    Published,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Published => "published",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SessionStatus::Draft),
            "published" => Ok(SessionStatus::Published),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

/// Owner details embedded in the public listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Session entity
///
/// `O` is what `user_id` carries: the owner's id, or the owner view in
/// [`PublishedSession`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session<O = Uuid> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: O,
    pub title: String,
    pub description: String,
    #[serde(rename = "youtube_url")]
    pub video_url: String,
    pub tags: Vec<String>,
    pub status: SessionStatus,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub likes: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Session as shown in the public listing
pub type PublishedSession = Session<OwnerView>;

impl Session {
    /// Attach the owner view, consuming the plain session
    pub fn with_owner(self, owner: OwnerView) -> PublishedSession {
        Session {
            id: self.id,
            user_id: owner,
            title: self.title,
            description: self.description,
            video_url: self.video_url,
            tags: self.tags,
            status: self.status,
            image_url: self.image_url,
            likes: self.likes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Request for session creation
///
/// There is no owner field: the owner is always the caller, and any
/// `user_id` sent by the client is dropped during deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "youtube_url", alias = "video_url")]
    pub video_url: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<SessionStatus>,
    #[serde(default, rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
}

/// Request for session update; absent fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "youtube_url", alias = "video_url")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<SessionStatus>,
    #[serde(default, rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
}

/// Validated session ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub tags: Vec<String>,
    pub status: SessionStatus,
    pub image_url: String,
    pub likes: i32,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<SessionStatus>,
    pub image_url: Option<String>,
    pub likes: Option<i32>,
}

impl SessionPatch {
    /// Apply the patch to a stored session
    pub fn apply_to(&self, session: &mut Session) {
        if let Some(title) = &self.title {
            session.title = title.clone();
        }
        if let Some(description) = &self.description {
            session.description = description.clone();
        }
        if let Some(video_url) = &self.video_url {
            session.video_url = video_url.clone();
        }
        if let Some(tags) = &self.tags {
            session.tags = tags.clone();
        }
        if let Some(status) = self.status {
            session.status = status;
        }
        if let Some(image_url) = &self.image_url {
            session.image_url = image_url.clone();
        }
        if let Some(likes) = self.likes {
            session.likes = likes;
        }
    }
}

fn required_text(value: &str, field: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(value.to_string())
}

fn like_count(likes: i64) -> Result<i32, String> {
    i32::try_from(likes)
        .ok()
        .filter(|likes| *likes >= 0)
        .ok_or_else(|| "Likes must be a non-negative integer".to_string())
}

/// Trim tags, drop blanks and repeats, keep first-seen order
fn tag_set(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !seen.iter().any(|t: &String| t == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

impl CreateSessionRequest {
    /// Validate the request and bind it to its owner
    pub fn into_new_session(self, owner_id: Uuid) -> Result<NewSession, String> {
        Ok(NewSession {
            user_id: owner_id,
            title: required_text(&self.title, "Title")?,
            description: self.description.unwrap_or_default(),
            video_url: required_text(&self.video_url, "Video URL")?,
            tags: tag_set(self.tags.unwrap_or_default()),
            status: self.status.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default().trim().to_string(),
            likes: like_count(self.likes.unwrap_or(0))?,
        })
    }
}

impl UpdateSessionRequest {
    /// Validate the provided fields
    pub fn into_patch(self) -> Result<SessionPatch, String> {
        Ok(SessionPatch {
            title: self
                .title
                .map(|title| required_text(&title, "Title"))
                .transpose()?,
            description: self.description,
            video_url: self
                .video_url
                .map(|url| required_text(&url, "Video URL"))
                .transpose()?,
            tags: self.tags.map(tag_set),
            status: self.status,
            image_url: self.image_url.map(|url| url.trim().to_string()),
            likes: self.likes.map(like_count).transpose()?,
        })
    }
}
