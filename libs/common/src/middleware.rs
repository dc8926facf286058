//! Bearer token authentication middleware
//!
//! This is the single place where tokens are checked. A request either
//! leaves here with a verified [`AuthUser`] in its extensions or is answered
//! with 401. Handlers behind the layer take `AuthUser` as an extractor and
//! never look at the token again.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::{
    identity::AuthUser,
    token::{TokenError, TokenService},
};

/// Reasons a request is turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No usable `Authorization: Bearer` header
    MissingToken,
    /// Signature or format check failed
    InvalidToken,
    /// Token is past its expiry
    ExpiredToken,
}

impl From<TokenError> for AuthRejection {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthRejection::ExpiredToken,
            TokenError::Invalid | TokenError::Signing(_) => AuthRejection::InvalidToken,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            AuthRejection::MissingToken => "Authentication required",
            AuthRejection::InvalidToken => "Invalid token",
            AuthRejection::ExpiredToken => "Token expired",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

/// Authentication middleware
///
/// Use with `axum::middleware::from_fn_with_state(token_service, auth_middleware)`.
pub async fn auth_middleware(
    State(tokens): State<TokenService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        debug!(path = %req.uri().path(), "Request without bearer token");
        AuthRejection::MissingToken
    })?;

    let claims = tokens.verify(token).map_err(|e| {
        debug!(path = %req.uri().path(), error = %e, "Rejected bearer token");
        AuthRejection::from(e)
    })?;

    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthRejection::MissingToken)
    }
}
