//! User model and auth payloads

use chrono::{DateTime, Utc};
use common::AuthUser;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
///
/// Not serializable on purpose: the password hash must never leave the
/// service. Convert to [`AuthUser`] for anything outward-facing.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public view: id, name and email only
    pub fn public_view(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// New user creation payload
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// Request for user registration
///
/// Missing fields deserialize as empty strings so they are reported by
/// validation rather than by the JSON extractor.
#[derive(Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// Request for user login
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

/// Response for token verification
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user: AuthUser,
}
