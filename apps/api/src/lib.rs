//! # Lavka API
//!
//! HTTP server for the Lavka product catalog.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Lavka API                                  │
//! │                                                                     │
//! │  Client ──► axum (8000) ──► auth chain ──► services ──► PostgreSQL  │
//! │                                                                     │
//! │  Auth chain (per request):                                          │
//! │    bearer token ─► CurrentUser ─► ActiveUser ─► RoleGate ─► handler │
//! │          401 ◄──────┘     400 ◄──────┘   403 ◄─────┘                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - HTTP server port (default: 8000)
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `DB_MAX_CONNECTIONS` - pool size (default: 20)
//! - `JWT_SECRET` - secret for JWT signing
//! - `JWT_ACCESS_LIFETIME_SECS` - access token lifetime (default: 1800)
//! - `CORS_ORIGINS` - comma-separated origins, `*` for any
//! - `BOOTSTRAP_ADMIN_PASSWORD` - initial admin password (first start only)
//! - `PAYMENT_BASE_URL` / `PAYMENT_CLIENT_ID` / `PAYMENT_CLIENT_SECRET`

pub mod auth;
pub mod config;
pub mod deps;
pub mod error;
pub mod routes;
pub mod services;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

use lavka_db::Database;

/// Shared application state.
///
/// Holds the process-wide database handle (created once at startup) and
/// the loaded configuration; everything request-scoped is resolved from
/// here.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
}
