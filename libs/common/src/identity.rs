//! Caller identity shared by token issuance, the auth middleware and handlers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user: what a token asserts and what handlers see
///
/// One value is attached to each authenticated request. It never carries
/// credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
