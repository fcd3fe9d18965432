//! API error handling
//!
//! Every failure is rendered as a HAL error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ss_auth::AuthError;
use ss_core::error::{SsError, ValidationErrors};
use ss_export::ExportError;

use crate::representers::hal::HalError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    Validation(ValidationErrors),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound { resource, id: id.to_string() }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_hal(&self) -> HalError {
        match self {
            ApiError::NotFound { resource, id } => {
                HalError::new("NotFound", format!("{} with id {} not found", resource, id))
            }
            ApiError::Validation(errors) => HalError::validation(errors),
            ApiError::Unauthorized(msg) => HalError::new("Unauthenticated", msg.clone()),
            ApiError::Forbidden(msg) => HalError::new("MissingPermission", msg.clone()),
            ApiError::BadRequest(msg) => HalError::new("InvalidRequestBody", msg.clone()),
            ApiError::Conflict(msg) => HalError::new("UpdateConflict", msg.clone()),
            ApiError::Internal(msg) => HalError::new("InternalError", msg.clone()),
        }
    }
}

impl From<SsError> for ApiError {
    fn from(err: SsError) -> Self {
        match err {
            SsError::NotFound { entity, value, .. } => ApiError::NotFound { resource: entity, id: value },
            SsError::Unauthorized { message } => ApiError::Unauthorized(message),
            SsError::Forbidden { message } => ApiError::Forbidden(message),
            SsError::Validation(errors) => ApiError::Validation(errors),
            SsError::Contract(e) => ApiError::Validation(e.into()),
            SsError::Conflict { message } => ApiError::Conflict(message),
            SsError::Database(_) | SsError::Export(_) | SsError::Internal(_) | SsError::Config(_) => {
                tracing::error!("Request failed: {}", err);
                ApiError::Internal("An internal error occurred".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(msg) => {
                tracing::error!("Authentication failed: {}", msg);
                ApiError::Internal("An internal error occurred".to_string())
            }
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        SsError::from(err).into()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            tracing::debug!("Request rejected with {}: {:?}", status, self);
        }
        (status, Json(self.to_hal())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
