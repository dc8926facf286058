use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod models;
mod repositories;
mod routes;
mod service;
mod state;

use common::{
    TokenConfig, TokenService,
    database::{self, DatabaseConfig},
    settings::ServerConfig,
};
use tokio::net::TcpListener;

use crate::{repositories::SessionRepository, service::SessionService, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

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

    let token_service = TokenService::new(TokenConfig::from_env()?);

    // Initialize repositories
    let session_repository = SessionRepository::new(pool);
    let session_service = SessionService::new(Arc::new(session_repository));

    let app_state = AppState {
        session_service,
        token_service,
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::load("API", 3001)?;
    let listener = TcpListener::bind(server_config.bind_address()).await?;
    info!("API service listening on {}", server_config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
