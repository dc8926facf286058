//! API service routes

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use common::{AuthUser, middleware::auth_middleware};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::ApiError,
    models::{CreateSessionRequest, UpdateSessionRequest},
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/session/get-all-sessions", get(get_all_sessions))
        .route("/session/my-sessions", get(get_my_sessions))
        .route("/session/create", post(create_session))
        .route("/session/update/:id", patch(update_session))
        .route("/session/delete/:id", delete(delete_session))
        .route_layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// All published sessions with their owners
pub async fn get_all_sessions(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.session_service.list_published().await?;
    Ok(Json(sessions))
}

/// The caller's own sessions
pub async fn get_my_sessions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.session_service.list_mine(user.id).await?;
    Ok(Json(sessions))
}

/// Create a session owned by the caller
pub async fn create_session(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let session = state.session_service.create(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Update one of the caller's sessions
pub async fn update_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            state.session_service.require_owned(user.id, &id).await?;
            return Err(rejection.into());
        }
    };
    let session = state.session_service.update(user.id, &id, payload).await?;

    Ok(Json(session))
}

/// Delete one of the caller's sessions
pub async fn delete_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.session_service.delete(user.id, &id).await?;

    Ok(Json(json!({"message": "Session deleted"})))
}
