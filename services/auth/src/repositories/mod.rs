//! Credential store contract and its implementations

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{NewUser, User};

pub mod user;

#[cfg(test)]
pub mod memory;

pub use user::UserRepository;

/// Persistence for user identity records
///
/// `create` reports a duplicate email as `DatabaseError::UniqueViolation`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by normalized email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Persist a new user
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;
}
