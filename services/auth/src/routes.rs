//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use common::{AuthUser, middleware::auth_middleware};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    error::AuthError,
    models::{LoginRequest, RegisterRequest, VerifyResponse},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/verify", get(verify))
        .route_layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
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
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload?;
    let response = state.auth_service.register(payload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload?;
    let response = state.auth_service.login(payload).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Token verification endpoint
///
/// The middleware has already checked the token; the claims come back as
/// the public user view.
pub async fn verify(user: AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        password::{PasswordService, test_params},
        repositories::memory::MemoryCredentialStore,
        service::AuthService,
    };
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use common::{TokenConfig, TokenService};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let token_service = TokenService::new(TokenConfig {
            secret: "routes-test-secret".to_string(),
            expiry_seconds: 3600,
        });
        let auth_service = AuthService::new(
            Arc::new(MemoryCredentialStore::new()),
            token_service.clone(),
            PasswordService::new(test_params()).unwrap(),
        );

        create_router(AppState {
            auth_service,
            token_service,
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = send(&app(), get_with_token("/health", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn register_login_verify_flow() {
        let app = app();

        let (status, body) = send(
            &app,
            post_json(
                "/auth/register",
                json!({"email": "a@x.com", "name": "A", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "a@x.com");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body["user"].get("password_hash").is_none());
        let user_id = body["user"]["id"].clone();

        let (status, body) = send(
            &app,
            post_json(
                "/auth/login",
                json!({"email": "a@x.com", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], user_id);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, get_with_token("/auth/verify", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], user_id);
        assert_eq!(body["user"]["name"], "A");
        assert_eq!(body["user"]["email"], "a@x.com");
    }

    #[tokio::test]
    async fn wrong_password_is_401_with_generic_message() {
        let app = app();
        send(
            &app,
            post_json(
                "/auth/register",
                json!({"email": "a@x.com", "name": "A", "password": "secret1"}),
            ),
        )
        .await;

        let wrong = send(
            &app,
            post_json("/auth/login", json!({"email": "a@x.com", "password": "wrong"})),
        )
        .await;
        let unknown = send(
            &app,
            post_json(
                "/auth/login",
                json!({"email": "ghost@x.com", "password": "secret1"}),
            ),
        )
        .await;

        assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.1, json!({"message": "Invalid credentials"}));
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn duplicate_registration_is_409() {
        let app = app();
        let body = json!({"email": "a@x.com", "name": "A", "password": "secret1"});

        let (first, _) = send(&app, post_json("/auth/register", body.clone())).await;
        let (second, message) = send(&app, post_json("/auth/register", body)).await;

        assert_eq!(first, StatusCode::CREATED);
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(message["message"], "Email already in use");
    }

    #[tokio::test]
    async fn bad_bodies_are_400() {
        let app = app();

        let (status, body) = send(
            &app,
            post_json("/auth/register", json!({"email": "a@x.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn verify_requires_a_valid_token() {
        let app = app();

        let (status, _) = send(&app, get_with_token("/auth/verify", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&app, get_with_token("/auth/verify", Some("abc.def.ghi"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("user").is_none());
    }
}
