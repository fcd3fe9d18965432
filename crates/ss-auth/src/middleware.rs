//! Request authentication
//!
//! Resolves the bearer token of a request to an active stored user.

use std::sync::Arc;

use ss_db::UserStore;
use thiserror::Error;

use crate::current_user::CurrentUser;
use crate::jwt::{extract_bearer_token, JwtError, JwtService};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    Required,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token expired")]
    TokenExpired,
    #[error("User account is disabled")]
    Inactive,
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug)]
pub enum AuthResult {
    Authenticated(CurrentUser),
    Failed(AuthError),
}

/// Request headers relevant for authentication
#[derive(Debug, Default)]
pub struct RequestHeaders {
    pub authorization: Option<String>,
}

impl RequestHeaders {
    pub fn bearer(token: &str) -> Self {
        Self {
            authorization: Some(format!("Bearer {}", token)),
        }
    }
}

/// Authenticator for validating requests
#[derive(Clone)]
pub struct Authenticator {
    jwt: Arc<JwtService>,
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(jwt: Arc<JwtService>, users: Arc<dyn UserStore>) -> Self {
        Self { jwt, users }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub async fn authenticate(&self, headers: &RequestHeaders) -> AuthResult {
        let Some(token) = headers
            .authorization
            .as_deref()
            .and_then(extract_bearer_token)
        else {
            return AuthResult::Failed(AuthError::Required);
        };

        let user_id = match self.jwt.get_user_id(token) {
            Ok(id) => id,
            Err(JwtError::Expired) => return AuthResult::Failed(AuthError::TokenExpired),
            Err(_) => return AuthResult::Failed(AuthError::InvalidCredentials),
        };

        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) if user.is_active => AuthResult::Authenticated(CurrentUser::from(&user)),
            Ok(Some(_)) => AuthResult::Failed(AuthError::Inactive),
            Ok(None) => AuthResult::Failed(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::error!("Failed to load user {} for authentication: {}", user_id, e);
                AuthResult::Failed(AuthError::Internal(e.to_string()))
            }
        }
    }
}
