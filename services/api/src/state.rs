//! Application state shared across handlers

use common::TokenService;

use crate::service::SessionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionService,
    pub token_service: TokenService,
}
