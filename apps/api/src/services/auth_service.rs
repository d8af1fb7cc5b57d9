//! Authentication service.
//!
//! Token-to-user resolution, credential checks, and account registration.
//! Every failure path logs a warning with enough context for audit but
//! never the full credential.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{info, warn};

use lavka_core::validation::{validate_password, validate_username};
use lavka_core::{NewUser, User, DEFAULT_ROLE};
use lavka_db::repository::user::NewUserRecord;
use lavka_db::UserRepository;

use crate::auth::JwtManager;
use crate::error::{ApiError, ApiResult};

/// Issued-token payload returned by the login endpoint.
#[derive(Debug, serde::Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Authentication and account service.
pub struct AuthService {
    users: UserRepository,
    jwt: JwtManager,
}

impl AuthService {
    /// Create a new authentication service.
    pub fn new(users: UserRepository, jwt: JwtManager) -> Self {
        AuthService { users, jwt }
    }

    /// Maps a bearer token to its user.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - token decodes and the subject exists
    /// * `Ok(None)` - token malformed/expired/forged, or subject unknown
    ///
    /// The caller turns `None` into the 401 challenge; database failures
    /// stay errors.
    pub async fn get_current_user(&self, token: &str) -> ApiResult<Option<User>> {
        let claims = match self.jwt.decode_token(token) {
            Ok(claims) => claims,
            Err(_) => return Ok(None),
        };

        let record = self.users.get_by_username(&claims.sub).await?;

        Ok(record.map(|r| r.into_user()))
    }

    /// Checks a username/password pair.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - credentials valid and the account is active
    /// * `Ok(None)` - unknown user, inactive account, or wrong password
    pub async fn authenticate_user(&self, username: &str, password: &str) -> ApiResult<Option<User>> {
        let record = match self.users.get_by_username(username).await? {
            Some(record) => record,
            None => {
                warn!(username = %username, "Authentication attempt for unknown user");
                return Ok(None);
            }
        };

        if !record.is_active {
            warn!(username = %username, "Authentication attempt for inactive user");
            return Ok(None);
        }

        if !verify_password(password, &record.hashed_password) {
            warn!(username = %username, "Wrong password");
            return Ok(None);
        }

        Ok(Some(record.into_user()))
    }

    /// Issues an access token for an authenticated user.
    pub fn issue_token(&self, user: &User) -> ApiResult<TokenResponse> {
        let access_token = self.jwt.generate_access_token(&user.username)?;

        info!(username = %user.username, "Token issued");

        Ok(TokenResponse {
            access_token,
            token_type: "bearer",
            expires_in: self.jwt.access_lifetime_secs(),
        })
    }

    /// Registers a new account.
    ///
    /// ## Errors
    /// * `BadRequest` - invalid username/password, or username taken
    pub async fn register_user(&self, new_user: NewUser) -> ApiResult<User> {
        validate_username(&new_user.username)?;
        validate_password(&new_user.password)?;

        if self.users.get_by_username(&new_user.username).await?.is_some() {
            warn!(username = %new_user.username, "Registration with taken username");
            return Err(ApiError::BadRequest(format!(
                "User '{}' already exists",
                new_user.username
            )));
        }

        let roles = if new_user.roles.is_empty() {
            vec![DEFAULT_ROLE.to_string()]
        } else {
            new_user.roles.clone()
        };

        let record = self
            .users
            .insert(&NewUserRecord {
                username: new_user.username.trim().to_string(),
                email: new_user.email.clone(),
                hashed_password: hash_password(&new_user.password)?,
                is_active: true,
                roles,
            })
            .await?;

        info!(username = %record.username, "User registered");

        Ok(record.into_user())
    }
}

/// Hashes a password with Argon2id and a fresh salt.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored Argon2 hash. Unparseable hashes
/// verify as false.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct-horse-battery").unwrap();

        assert!(verify_password("correct-horse-battery", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
