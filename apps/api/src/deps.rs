//! Request-scoped dependency chain.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Auth Chain (per request)                       │
//! │                                                                     │
//! │  Authorization: Bearer <token>                                      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  CurrentUser extractor ──── fail ──► 401 + WWW-Authenticate: Bearer │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ActiveUser extractor ───── fail ──► 400 (inactive account)         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  RoleGate::check ────────── fail ──► 403 (missing required role)    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  handler runs                                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each step completes (or fails) before the next is invoked; a failing
//! step logs exactly one warning and never the full credential.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use lavka_core::User;

use crate::auth::{extract_bearer_token, token_log_prefix};
use crate::error::ApiError;
use crate::services::Services;
use crate::AppState;

// =============================================================================
// Current User
// =============================================================================

/// The authenticated caller, resolved from the bearer token.
///
/// Extraction fails with 401 (and the `WWW-Authenticate: Bearer`
/// challenge) when the header is absent, the token does not decode, or
/// the token's subject is unknown.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| {
                warn!("Request without bearer credentials");
                ApiError::Unauthorized
            })?;

        let services = Services::new(state);

        match services.auth().get_current_user(token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(
                    token_prefix = %token_log_prefix(token),
                    "Invalid authentication credentials"
                );
                Err(ApiError::Unauthorized)
            }
        }
    }
}

// =============================================================================
// Active User
// =============================================================================

/// The authenticated caller, additionally checked to be active.
///
/// Extraction fails with 400 when the account is disabled, regardless of
/// the roles it holds.
#[derive(Debug, Clone)]
pub struct ActiveUser(pub User);

impl ActiveUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

/// The active-account check behind the [`ActiveUser`] extractor.
pub fn ensure_active(user: &User) -> Result<(), ApiError> {
    if user.is_active {
        Ok(())
    } else {
        warn!(username = %user.username, "Inactive user denied access");
        Err(ApiError::InactiveUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ActiveUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        ensure_active(&user)?;

        Ok(ActiveUser(user))
    }
}

// =============================================================================
// Role Gate
// =============================================================================

/// Role-based gate, built once with the acceptable roles and applied to an
/// already-active user.
///
/// The check is a logical OR over `required`: holding any one of them
/// authorizes (first match wins).
#[derive(Debug, Clone)]
pub struct RoleGate {
    required: Vec<String>,
}

impl RoleGate {
    /// Builds a gate accepting any of `required`.
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RoleGate {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks the gate, failing with 403 when no required role is held.
    pub fn check(&self, user: &User) -> Result<(), ApiError> {
        let required: Vec<&str> = self.required.iter().map(String::as_str).collect();

        if user.has_any_role(&required) {
            return Ok(());
        }

        warn!(
            username = %user.username,
            required_roles = %self.required.join(", "),
            "Access denied: missing required role"
        );

        Err(ApiError::Forbidden)
    }

    /// Gate form of [`check`](Self::check): passes the user through
    /// unchanged on success.
    pub fn resolve(&self, user: ActiveUser) -> Result<ActiveUser, ApiError> {
        self.check(user.user())?;
        Ok(user)
    }
}

/// Gate for catalog writes (create/update).
pub fn catalog_managers() -> RoleGate {
    RoleGate::new(["admin", "manager"])
}

/// Gate for catalog deletion.
pub fn admins_only() -> RoleGate {
    RoleGate::new(["admin"])
}

// =============================================================================
// Read Gates
// =============================================================================

/// Authorizes catalog reads.
///
/// Deliberately a no-op: any active, authenticated user may read product
/// data. Role gating is reserved for writes.
pub fn can_read_products(user: ActiveUser) -> ActiveUser {
    user
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_active: bool, roles: &[&str]) -> User {
        User {
            id: 1,
            username: "tester".to_string(),
            email: None,
            is_active,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_ensure_active_passes_active_user() {
        assert!(ensure_active(&user(true, &[])).is_ok());
    }

    #[test]
    fn test_ensure_active_rejects_regardless_of_roles() {
        // Even an admin is rejected while inactive.
        let result = ensure_active(&user(false, &["admin"]));
        assert!(matches!(result, Err(ApiError::InactiveUser)));
    }

    #[test]
    fn test_role_gate_admin_membership() {
        let gate = RoleGate::new(["admin"]);

        assert!(gate.check(&user(true, &["admin"])).is_ok());
        assert!(gate.check(&user(true, &["user", "admin"])).is_ok());
        assert!(matches!(
            gate.check(&user(true, &["user"])),
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            gate.check(&user(true, &[])),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_role_gate_or_semantics() {
        let gate = catalog_managers();

        assert!(gate.check(&user(true, &["manager"])).is_ok());
        assert!(gate.check(&user(true, &["admin"])).is_ok());
        assert!(gate.check(&user(true, &["cashier"])).is_err());
    }

    #[test]
    fn test_role_gate_resolve_passes_user_through() {
        let gate = admins_only();
        let active = ActiveUser(user(true, &["admin"]));

        let resolved = gate.resolve(active.clone()).unwrap();
        assert_eq!(resolved.user(), active.user());
    }

    #[test]
    fn test_can_read_products_is_identity() {
        let active = ActiveUser(user(true, &["cashier"]));
        let passed = can_read_products(active.clone());

        assert_eq!(passed.user(), active.user());
    }
}
