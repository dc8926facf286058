use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod models;
mod password;
mod repositories;
mod routes;
mod service;
mod validation;

use common::{
    TokenConfig, TokenService,
    database::{self, DatabaseConfig},
    settings::ServerConfig,
};
use tokio::net::TcpListener;

use crate::{
    password::{PasswordParams, PasswordService},
    repositories::UserRepository,
    service::AuthService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub token_service: TokenService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let token_config = TokenConfig::from_env()?;
    let token_service = TokenService::new(token_config);
    info!(
        expiry_seconds = token_service.expiry_seconds(),
        "Token service initialized"
    );

    let passwords = PasswordService::new(PasswordParams::from_env())?;
    let user_repository = UserRepository::new(pool);
    let auth_service = AuthService::new(
        Arc::new(user_repository),
        token_service.clone(),
        passwords,
    );

    let app_state = AppState {
        auth_service,
        token_service,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::load("AUTH", 3000)?;
    let listener = TcpListener::bind(server_config.bind_address()).await?;
    info!(
        "Authentication service listening on {}",
        server_config.bind_address()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
