//! Lavka API server entry point.
//!
//! Startup order: tracing → config → database (pool + migrations) →
//! admin bootstrap → router → serve until shutdown signal.

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lavka_api::services::Services;
use lavka_api::{ApiConfig, AppState};
use lavka_core::{NewUser, ADMIN_ROLE};
use lavka_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Lavka API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(port = config.http_port, "Configuration loaded");

    // Connect to database and run migrations
    let db = Database::new(
        DbConfig::new(&config.database_url).max_connections(config.db_max_connections),
    )
    .await?;
    info!("Connected to PostgreSQL");

    let state = AppState { db, config };

    // Make sure an administrator exists before the first login
    bootstrap_admin(&state).await?;

    // Build the router and serve
    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let app = lavka_api::routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Creates the initial admin account when no admin exists yet.
///
/// Re-running against a bootstrapped database is a no-op.
async fn bootstrap_admin(state: &AppState) -> anyhow::Result<()> {
    let services = Services::new(state);

    let admins = services.users().count_with_role(ADMIN_ROLE).await?;
    if admins > 0 {
        return Ok(());
    }

    warn!("No admin account found, creating bootstrap admin");

    services
        .auth()
        .register_user(NewUser {
            username: "admin".to_string(),
            password: state.config.bootstrap_admin_password.clone(),
            email: Some("admin@example.com".to_string()),
            roles: vec![ADMIN_ROLE.to_string()],
        })
        .await?;

    info!("Bootstrap admin account created");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
