//! Registration and login

use common::{AuthUser, TokenService};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    error::AuthError,
    models::{AuthResponse, LoginRequest, NewUser, RegisterRequest},
    password::PasswordService,
    repositories::CredentialStore,
    validation::{normalize_email, validate_email, validate_name, validate_password},
};

/// Orchestrates the credential store, password hashing and token issuance
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenService,
    passwords: PasswordService,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        tokens: TokenService,
        passwords: PasswordService,
    ) -> Self {
        Self {
            store,
            tokens,
            passwords,
        }
    }

    /// Create an account and sign the new user in
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);
        let name = request.name.trim().to_string();

        validate_email(&email).map_err(AuthError::Validation)?;
        validate_name(&name).map_err(AuthError::Validation)?;
        validate_password(&request.password).map_err(AuthError::Validation)?;

        // Best-effort pre-check; the unique index is the real guard
        let existing = self.store.find_by_email(&email).await.map_err(|e| {
            error!("Failed to look up user during registration: {}", e);
            AuthError::Internal
        })?;
        if existing.is_some() {
            info!("Registration rejected: email already in use");
            return Err(AuthError::Conflict);
        }

        let password_hash = self.hash_password(request.password).await?;

        let new_user = NewUser {
            email,
            name,
            password_hash,
        };
        let user = self.store.create(&new_user).await.map_err(|e| {
            if e.is_unique_violation() {
                warn!("Concurrent registration for the same email lost the race");
                AuthError::Conflict
            } else {
                error!("Failed to create user: {}", e);
                AuthError::Internal
            }
        })?;

        let view = user.public_view();
        let token = self.issue_token(&view)?;
        info!(user_id = %view.id, "User registered");

        Ok(AuthResponse { token, user: view })
    }

    /// Check credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let email = normalize_email(&request.email);
        let user = self.store.find_by_email(&email).await.map_err(|e| {
            error!("Failed to look up user during login: {}", e);
            AuthError::Internal
        })?;

        let Some(user) = user else {
            self.burn_decoy(request.password).await;
            info!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .check_password(request.password, user.password_hash.clone())
            .await?
        {
            info!(user_id = %user.id, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let view = user.public_view();
        let token = self.issue_token(&view)?;
        info!(user_id = %view.id, "User logged in");

        Ok(AuthResponse { token, user: view })
    }

    fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        self.tokens.issue(user).map_err(|e| {
            error!("Failed to issue token: {}", e);
            AuthError::Internal
        })
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| {
                error!("Password hashing task failed: {}", e);
                AuthError::Internal
            })?
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                AuthError::Internal
            })
    }

    async fn check_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
            .await
            .map_err(|e| {
                error!("Password verification task failed: {}", e);
                AuthError::Internal
            })?
            .map_err(|e| {
                error!("Failed to verify password: {}", e);
                AuthError::Internal
            })
    }

    async fn burn_decoy(&self, password: String) {
        let passwords = self.passwords.clone();
        let _ = tokio::task::spawn_blocking(move || passwords.verify_decoy(&password)).await;
    }
}
