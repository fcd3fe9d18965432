//! Task activity catalogue

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use ss_core::traits::Id;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, HalResponse};
use crate::representers::hal::API_PREFIX;
use crate::representers::TaskActivityRepresenter;

/// Every known activity type; the default one is created on first use
///
/// GET /api/v1/task-activities
pub async fn list_task_activities(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    state.task_activities.get_or_create_default().await?;
    let activities = state.task_activities.list().await?;
    Ok(HalResponse(TaskActivityRepresenter::represent_collection(
        &activities,
        None,
        &format!("{}/task-activities", API_PREFIX),
    )))
}

/// GET /api/v1/task-activities/:id
pub async fn get_task_activity(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let activity = state.task_activities.find(id).await?;
    Ok(HalResponse(TaskActivityRepresenter::represent(&activity, None)))
}
