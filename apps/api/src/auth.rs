//! JWT authentication module.
//!
//! Handles access-token generation and validation, bearer-header parsing,
//! and credential-safe log formatting.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Characters of a token that may appear in a log record. The remainder of
/// the credential must never be logged.
pub const TOKEN_LOG_PREFIX_LEN: usize = 10;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
#[derive(Debug, Clone)]
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, access_lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            access_lifetime_secs,
        }
    }

    /// Generate an access token for the given username.
    pub fn generate_access_token(&self, username: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_lifetime_secs);

        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    ///
    /// Malformed, forged and expired tokens all come back as
    /// `ApiError::Unauthorized`; the caller decides whether to log.
    pub fn decode_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| ApiError::Unauthorized)?;

        Ok(token_data.claims)
    }

    /// Access token lifetime in seconds (reported to clients on issue).
    pub fn access_lifetime_secs(&self) -> i64 {
        self.access_lifetime_secs
    }
}

/// Extract the bearer token from an Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Truncates a token for logging: at most the first
/// [`TOKEN_LOG_PREFIX_LEN`] characters, never the full credential.
pub fn token_log_prefix(token: &str) -> String {
    token.chars().take(TOKEN_LOG_PREFIX_LEN).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager.generate_access_token("admin").unwrap();
        let claims = manager.decode_token(&token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let result = manager.decode_token("abc123-not-a-jwt");
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtManager::new("secret-a".to_string(), 3600);
        let verifier = JwtManager::new("secret-b".to_string(), 3600);

        let token = issuer.generate_access_token("admin").unwrap();
        assert!(matches!(
            verifier.decode_token(&token),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Negative lifetime puts exp far enough in the past to clear the
        // default decode leeway.
        let manager = JwtManager::new("test-secret".to_string(), -3600);

        let token = manager.generate_access_token("admin").unwrap();
        assert!(matches!(
            manager.decode_token(&token),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
    }

    #[test]
    fn test_token_log_prefix_truncates() {
        assert_eq!(token_log_prefix("abc123def456xyz"), "abc123def4");
        assert_eq!(token_log_prefix("short"), "short");
        assert_eq!(token_log_prefix(""), "");
    }

    #[test]
    fn test_token_log_prefix_is_char_safe() {
        // Counts characters, not bytes, so multibyte input cannot split.
        assert_eq!(token_log_prefix("ααααααααααααα"), "αααααααααα");
    }
}
