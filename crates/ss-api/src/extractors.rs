//! Axum extractors for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use ss_auth::{AuthResult, Authenticator, CurrentUser, JwtService, RequestHeaders};
use ss_core::pagination::PaginationParams;
use ss_core::period::MonthPeriod;
use ss_export::ExportFormat;
use ss_services::{
    AccountPolicy, ProjectService, ReportService, Stores, TaskActivityService, UserService,
};

use crate::error::ApiError;
use crate::representers::hal::HalError;

pub const HAL_CONTENT_TYPE: &str = "application/hal+json; charset=utf-8";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub users: UserService,
    pub projects: ProjectService,
    pub reports: ReportService,
    pub task_activities: TaskActivityService,
    pub jwt: Arc<JwtService>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(stores: Stores, policy: AccountPolicy, jwt: JwtService) -> Self {
        let jwt = Arc::new(jwt);
        Self {
            users: UserService::new(stores.clone(), policy),
            projects: ProjectService::new(stores.clone()),
            reports: ReportService::new(stores.clone()),
            task_activities: TaskActivityService::new(stores.clone()),
            authenticator: Arc::new(Authenticator::new(jwt.clone(), stores.users.clone())),
            jwt,
            stores,
        }
    }
}

/// Authenticated user extractor
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let headers = RequestHeaders {
            authorization: parts
                .headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        };

        match app_state.authenticator.authenticate(&headers).await {
            AuthResult::Authenticated(user) => Ok(AuthenticatedUser(user)),
            AuthResult::Failed(err) => Err(err.into()),
        }
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// `?offset=&pageSize=`, falling back to the first page
pub struct Pagination(pub PaginationParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|_| Query(PaginationParams::default()));
        Ok(Pagination(params.normalized()))
    }
}

impl std::ops::Deref for Pagination {
    type Target = PaginationParams;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub format: Option<String>,
}

/// `?year=&month=&format=`; missing values mean the current month and xlsx
#[derive(Debug, Clone, Copy)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
    pub format: ExportFormat,
}

impl MonthQuery {
    pub fn period(&self) -> Result<MonthPeriod, ApiError> {
        Ok(MonthPeriod::new(self.year, self.month)?)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MonthQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<MonthParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        let format = match params.format.as_deref() {
            Some(format) => format.parse::<ExportFormat>()?,
            None => ExportFormat::default(),
        };
        let today = Local::now().date_naive();
        Ok(MonthQuery {
            year: params.year.unwrap_or_else(|| today.year()),
            month: params.month.unwrap_or_else(|| today.month()),
            format,
        })
    }
}

/// HAL+JSON response wrapper
pub struct HalResponse<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for HalResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => ([(header::CONTENT_TYPE, HAL_CONTENT_TYPE)], body).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(HalError::new("InternalError", "An internal error occurred")),
                )
                    .into_response()
            }
        }
    }
}
