//! Users API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use ss_core::traits::Id;
use ss_models::{AdminUpdateUser, NewUser, UpdateProfile};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, HalResponse, Pagination};
use crate::representers::UserRepresenter;

/// List users, ordered by e-mail
///
/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let users = state.users.list(&user.0).await?;
    let total = users.len() as i64;
    let page = pagination.apply(users);

    Ok(HalResponse(UserRepresenter::represent_collection(
        page,
        total,
        pagination.offset,
        pagination.page_size,
    )))
}

/// Create an account of any role
///
/// POST /api/v1/users
#[tracing::instrument(skip(state, user, dto), fields(actor = user.id))]
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let created = state.users.create(&user.0, dto).await?;
    Ok((StatusCode::CREATED, HalResponse(UserRepresenter::represent(&created, true))))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let found = state.users.get(&user.0, id).await?;
    Ok(HalResponse(UserRepresenter::represent(&found, user.is_admin())))
}

/// Administrator edit, may change role and active flag
///
/// PATCH /api/v1/users/:id
#[tracing::instrument(skip(state, user, dto), fields(actor = user.id))]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<AdminUpdateUser>,
) -> ApiResult<impl IntoResponse> {
    let updated = state.users.update_by_admin(&user.0, id, dto).await?;
    Ok(HalResponse(UserRepresenter::represent(&updated, true)))
}

/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let me = state.users.get(&user.0, user.id).await?;
    Ok(HalResponse(UserRepresenter::represent_me(&me)))
}

/// PATCH /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<UpdateProfile>,
) -> ApiResult<impl IntoResponse> {
    let me = state.users.update_profile(&user.0, dto).await?;
    Ok(HalResponse(UserRepresenter::represent_me(&me)))
}
