//! # lavka-core: Pure Domain Logic for Lavka
//!
//! This crate is the heart of the Lavka catalog backend. It contains the
//! domain types and rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Lavka Architecture                            │
//! │                                                                     │
//! │  HTTP clients                                                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  apps/api (axum)        auth chain, services, routes                │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ★ lavka-core (THIS CRATE) ★                                        │
//! │                                                                     │
//! │   ┌───────────┐  ┌───────────┐  ┌───────────┐                       │
//! │   │   types   │  │   roles   │  │ validation│                       │
//! │   │  Product  │  │ membership│  │   rules   │                       │
//! │   │   User    │  │  parsing  │  │  checks   │                       │
//! │   └───────────┘  └───────────┘  └───────────┘                       │
//! │                                                                     │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS                │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  lavka-db (Database Layer)                                          │
//! │  PostgreSQL queries, migrations, repositories, seed loader          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User)
//! - [`roles`] - Role parsing and membership rules
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Decimal Money**: Prices are `rust_decimal::Decimal`, never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod roles;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use types::{NewProduct, NewUser, Product, User};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Role granted to accounts registered without an explicit role list.
pub const DEFAULT_ROLE: &str = "user";

/// Role with unrestricted access to every gated operation.
pub const ADMIN_ROLE: &str = "admin";
