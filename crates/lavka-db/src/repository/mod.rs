//! # Repository Module
//!
//! Database repository implementations for Lavka.
//!
//! ## Repository Pattern
//! ```text
//! HTTP handler
//!      │  db.products().list(&filter)
//!      ▼
//! ProductRepository
//! ├── list(&self, filter)
//! ├── get_by_id(&self, id)
//! ├── insert(&self, product)
//! └── ...
//!      │  SQL query
//!      ▼
//! PostgreSQL
//! ```
//!
//! SQL stays isolated in this module; handlers and services never see a
//! query string.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and filtered listing
//! - [`user::UserRepository`] - Account lookup and registration

pub mod product;
pub mod user;
