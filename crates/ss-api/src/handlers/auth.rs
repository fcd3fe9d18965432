//! Account registration and token login

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use ss_models::SignupUser;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, HalResponse};
use crate::representers::hal::{HalLink, HalResource, API_PREFIX};
use crate::representers::UserRepresenter;

#[derive(Debug, Deserialize)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRepresentation {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Register a new employee account
///
/// POST /api/v1/auth/signup
#[tracing::instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn signup(
    State(state): State<AppState>,
    Json(dto): Json<SignupUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.signup(dto).await?;
    Ok((StatusCode::CREATED, HalResponse(UserRepresenter::represent(&user, false))))
}

/// Exchange credentials for a bearer token
///
/// POST /api/v1/auth/login
#[tracing::instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.authenticate(&dto.email, &dto.password).await?;
    let user_id = user
        .id
        .ok_or_else(|| ApiError::internal("Stored user without id"))?;

    let token = state
        .jwt
        .create_token(user_id, Some(user.email.clone()), Some(user.user_type))
        .map_err(|e| {
            tracing::error!("Failed to issue token for {}: {}", user.email, e);
            ApiError::internal("Could not issue a token")
        })?;

    tracing::info!("User {} logged in", user.email);
    let body = TokenRepresentation {
        token,
        token_type: "Bearer",
        expires_in: state.jwt.expiry_seconds(),
    };
    Ok(HalResponse(
        HalResource::new("Token", body)
            .with_link("user", HalLink::new(format!("{}/users/me", API_PREFIX))),
    ))
}
