use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod jwt;
mod middleware;
mod password;
mod routes;
mod service;
mod settings;
#[cfg(test)]
mod test_support;
mod validation;

use common::{
    ResidentRepository,
    database::{self, DatabaseConfig},
    settings::ServerConfig,
};

use crate::{
    jwt::{JwtConfig, JwtService},
    service::AuthService,
    settings::AuthSettings,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState<R> {
    pub auth_service: AuthService<R>,
    pub jwt_service: JwtService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

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

    // Initialize JWT service
    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    let auth_settings = AuthSettings::load()?;
    if auth_settings.allow_plaintext_passwords {
        info!("Plaintext password rows are accepted at login");
    }

    let app_state = AppState {
        auth_service: AuthService::new(
            ResidentRepository::new(pool),
            jwt_service.clone(),
            auth_settings,
        ),
        jwt_service,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::load("AUTH", 3000)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    info!(
        "Authentication service listening on {}",
        server_config.bind_address()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
