//! JWT service for identity token issuance and verification
//!
//! Tokens are HS256-signed with a single process-wide secret read at
//! startup. Nothing is stored server-side: a token is valid exactly when its
//! signature checks out and its expiry has not passed. Rotating the secret
//! invalidates every outstanding token.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::identity::AuthUser;

/// Default token lifetime: 24 hours
pub const DEFAULT_TOKEN_EXPIRY: u64 = 86_400;

/// Token configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// Shared signing secret
    pub secret: String,
    /// Token lifetime in seconds
    pub expiry_seconds: u64,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret shared by every service (required)
    /// - `JWT_EXPIRY`: Token lifetime in seconds (default: 86400)
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let expiry_seconds = std::env::var("JWT_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|expiry| *expiry > 0)
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);

        Ok(TokenConfig {
            secret,
            expiry_seconds,
        })
    }
}

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

/// Token failures
#[derive(Error, Debug)]
pub enum TokenError {
    /// Malformed token or bad signature
    #[error("invalid token")]
    Invalid,

    /// Signature is fine but the token is past its expiry
    #[error("token expired")]
    Expired,

    /// The token could not be signed
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies identity tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_seconds: u64,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            expiry_seconds: config.expiry_seconds,
        }
    }

    /// Issue a token for the given identity
    pub fn issue(&self, user: &AuthUser) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now().timestamp())
    }

    pub(crate) fn issue_at(&self, user: &AuthUser, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.expiry_seconds as i64),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Validate a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    /// Token lifetime in seconds
    pub fn expiry_seconds(&self) -> u64 {
        self.expiry_seconds
    }
}
