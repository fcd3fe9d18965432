//! JWT Authentication
//!
//! Tokens carry the user id and, for clients, the email and role. The role in
//! a token is informational only; requests re-read the user from storage.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use ss_core::traits::Id;
use ss_models::UserType;
use thiserror::Error;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserType>,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// JWT service for creating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: i64,
}

impl JwtService {
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_seconds: expiry_hours * 3600,
        }
    }

    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_seconds
    }

    pub fn create_token(
        &self,
        user_id: Id,
        email: Option<String>,
        role: Option<UserType>,
    ) -> Result<String, JwtError> {
        self.create_token_expiring_in(user_id, email, role, self.expiry_seconds)
    }

    pub fn create_token_expiring_in(
        &self,
        user_id: Id,
        email: Option<String>,
        role: Option<UserType>,
        expires_in_seconds: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + expires_in_seconds).max(0) as usize,
            iat: now.max(0) as usize,
            jti: Some(uuid::Uuid::new_v4().to_string()),
            email,
            role,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    pub fn get_user_id(&self, token: &str) -> Result<Id, JwtError> {
        let claims = self.validate_token(token)?;
        claims
            .sub
            .parse()
            .map_err(|_| JwtError::Invalid("Invalid user ID in token".to_string()))
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

    #[test]
    fn test_create_and_validate_token() {
        let service = JwtService::new(SECRET, 24);

        let token = service
            .create_token(1, Some("admin@codepoets.it".into()), Some(UserType::Admin))
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.email, Some("admin@codepoets.it".into()));
        assert_eq!(claims.role, Some(UserType::Admin));
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(SECRET, 24);
        let token = service
            .create_token_expiring_in(1, None, None, -3600)
            .unwrap();
        assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = JwtService::new(SECRET, 1).create_token(1, None, None).unwrap();
        let other = JwtService::new(b"another-secret-key-of-32-bytes!!", 1);
        assert!(matches!(other.validate_token(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
    }

    #[test]
    fn test_get_user_id() {
        let service = JwtService::new(SECRET, 1);
        let token = service.create_token(42, None, None).unwrap();
        assert_eq!(service.get_user_id(&token).unwrap(), 42);
    }
}
