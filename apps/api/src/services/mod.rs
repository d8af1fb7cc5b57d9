//! Service layer: request-scoped service resolution.
//!
//! ## Resolution Chain
//! ```text
//! AppState (process-wide pool)          ← built once in main
//!      │
//!      ▼
//! Services::new(&state)                 ← per request, cheap
//!      ├── users() / products_repo()    ← repositories over the pool
//!      ├── auth()                       ← AuthService (db-backed)
//!      ├── product()                    ← ProductService (db-backed)
//!      └── payment()                    ← PaymentService (no db)
//! ```
//!
//! Every constructor here is non-failing; failures only happen when a
//! service is actually asked to do work. Each resolution step completes
//! before the next is invoked.

pub mod auth_service;
pub mod payment_service;
pub mod product_service;

pub use auth_service::AuthService;
pub use payment_service::PaymentService;
pub use product_service::ProductService;

use lavka_db::{ProductRepository, UserRepository};

use crate::auth::JwtManager;
use crate::AppState;

/// Per-request service factory.
///
/// Holds a clone of the process-wide database handle; constructing the
/// factory or any service from it never fails.
#[derive(Clone)]
pub struct Services {
    db: lavka_db::Database,
    jwt: JwtManager,
    payment: PaymentConfig,
}

/// Payment provider settings carried into [`PaymentService`].
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Services {
    /// Resolves the factory from application state.
    pub fn new(state: &AppState) -> Self {
        Services {
            db: state.db.clone(),
            jwt: JwtManager::new(
                state.config.jwt_secret.clone(),
                state.config.jwt_access_lifetime_secs,
            ),
            payment: PaymentConfig {
                base_url: state.config.payment_base_url.clone(),
                client_id: state.config.payment_client_id.clone(),
                client_secret: state.config.payment_client_secret.clone(),
            },
        }
    }

    /// User repository over the shared pool.
    pub fn users(&self) -> UserRepository {
        self.db.users()
    }

    /// Product repository over the shared pool.
    pub fn products_repo(&self) -> ProductRepository {
        self.db.products()
    }

    /// Authentication service (token decode/validate, login, registration).
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.users(), self.jwt.clone())
    }

    /// Catalog service.
    pub fn product(&self) -> ProductService {
        ProductService::new(self.products_repo())
    }

    /// Payment provider client. Constructed without any database
    /// dependency.
    pub fn payment(&self) -> PaymentService {
        PaymentService::new(self.payment.clone())
    }
}
