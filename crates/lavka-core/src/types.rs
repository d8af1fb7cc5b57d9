//! # Domain Types
//!
//! Core domain types used throughout Lavka.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐                          │
//! │  │    Product      │   │      User       │                          │
//! │  │  ─────────────  │   │  ─────────────  │                          │
//! │  │  id (serial)    │   │  id (serial)    │                          │
//! │  │  sku_code       │   │  username       │                          │
//! │  │  barcode UNIQUE │   │  is_active      │                          │
//! │  │  price, cost    │   │  roles (open)   │                          │
//! │  └─────────────────┘   └─────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `New*` variants carry the caller-supplied fields of a row that does not
//! exist yet; the surrogate `id` is assigned by the database.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::roles::role_matches;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// `barcode` is the unique conflict key for catalog seeding: a row whose
/// barcode already exists in the table is discarded on import, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Surrogate key, assigned by the database.
    pub id: i32,

    /// Business identifier from the upstream inventory system.
    pub sku_code: String,

    /// Barcode (EAN-13 and friends). Unique when present.
    pub barcode: Option<String>,

    /// Unit of measure ("шт", "кг", ...).
    pub unit: String,

    /// Display name.
    pub sku_name: String,

    /// Status flag carried over from the 1C export.
    pub status_1c: String,

    /// Department the product is sold from.
    pub department: String,

    /// Product group.
    pub group_name: String,

    /// Product subgroup, where the upstream data has one.
    pub subgroup: Option<String>,

    /// Supplier name.
    pub supplier: String,

    /// Purchase price.
    pub cost_price: Decimal,

    /// Sale price.
    pub price: Decimal,
}

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku_code: String,
    pub barcode: Option<String>,
    pub unit: String,
    pub sku_name: String,
    pub status_1c: String,
    pub department: String,
    pub group_name: String,
    pub subgroup: Option<String>,
    pub supplier: String,
    pub cost_price: Decimal,
    pub price: Decimal,
}

// =============================================================================
// User
// =============================================================================

/// An authenticated account.
///
/// Constructed fresh on every request from token claims plus the stored row;
/// never cached across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate key, assigned by the database.
    pub id: i32,

    /// Unique login name. The JWT `sub` claim carries this value.
    pub username: String,

    /// Contact email, if provided at registration.
    pub email: Option<String>,

    /// Inactive accounts fail the active-user gate with 400.
    pub is_active: bool,

    /// Open role set. Roles are data-driven strings, not a closed enum.
    pub roles: Vec<String>,
}

impl User {
    /// Returns true if the user holds at least one of `required` (logical OR,
    /// first match wins).
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        required
            .iter()
            .any(|r| self.roles.iter().any(|held| role_matches(held, r)))
    }

    /// Returns true if the user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.has_any_role(&[crate::ADMIN_ROLE])
    }
}

/// Fields for registering a user. The password arrives in the clear and is
/// hashed before it reaches storage.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(roles: &[&str]) -> User {
        User {
            id: 1,
            username: "tester".to_string(),
            email: None,
            is_active: true,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_has_any_role_or_semantics() {
        let user = user_with_roles(&["manager"]);

        assert!(user.has_any_role(&["admin", "manager"]));
        assert!(user.has_any_role(&["manager"]));
        assert!(!user.has_any_role(&["admin"]));
        assert!(!user.has_any_role(&[]));
    }

    #[test]
    fn test_has_any_role_ignores_case_and_padding() {
        let user = user_with_roles(&[" Admin "]);
        assert!(user.has_any_role(&["admin"]));
    }

    #[test]
    fn test_is_admin() {
        assert!(user_with_roles(&["admin"]).is_admin());
        assert!(user_with_roles(&["user", "admin"]).is_admin());
        assert!(!user_with_roles(&["user"]).is_admin());
        assert!(!user_with_roles(&[]).is_admin());
    }

    #[test]
    fn test_inactive_user_still_reports_roles() {
        // Role membership is independent of the active flag; the active-user
        // gate rejects before any role check runs.
        let mut user = user_with_roles(&["admin"]);
        user.is_active = false;
        assert!(user.has_any_role(&["admin"]));
    }
}
