//! Project API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use ss_core::traits::Id;
use ss_models::{CreateProjectDto, CreateTaskActivityDto, UpdateProjectDto};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, HalResponse, Pagination};
use crate::representers::hal::API_PREFIX;
use crate::representers::{ProjectRepresenter, TaskActivityRepresenter};

/// Admins list every project, managers the ones they manage
///
/// GET /api/v1/projects
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let projects = state.projects.list(&user.0).await?;
    let total = projects.len() as i64;
    let page = pagination.apply(projects);

    Ok(HalResponse(ProjectRepresenter::represent_collection(
        &page,
        &user.0,
        total,
        pagination.offset,
        pagination.page_size,
    )))
}

/// GET /api/v1/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.get(&user.0, id).await?;
    Ok(HalResponse(ProjectRepresenter::represent(&project, &user.0)))
}

/// POST /api/v1/projects
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.create(&user.0, dto).await?;
    Ok((
        StatusCode::CREATED,
        HalResponse(ProjectRepresenter::represent(&project, &user.0)),
    ))
}

/// PATCH /api/v1/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.update(&user.0, id, dto).await?;
    Ok(HalResponse(ProjectRepresenter::represent(&project, &user.0)))
}

/// DELETE /api/v1/projects/:id
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    state.projects.delete(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/:id/managers/:user_id
pub async fn add_manager(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, user_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.add_manager(&user.0, id, user_id).await?;
    Ok(HalResponse(ProjectRepresenter::represent(&project, &user.0)))
}

/// DELETE /api/v1/projects/:id/managers/:user_id
pub async fn remove_manager(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, user_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.remove_manager(&user.0, id, user_id).await?;
    Ok(HalResponse(ProjectRepresenter::represent(&project, &user.0)))
}

/// POST /api/v1/projects/:id/members/:user_id
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, user_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.add_member(&user.0, id, user_id).await?;
    Ok(HalResponse(ProjectRepresenter::represent(&project, &user.0)))
}

/// DELETE /api/v1/projects/:id/members/:user_id
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, user_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.remove_member(&user.0, id, user_id).await?;
    Ok(HalResponse(ProjectRepresenter::represent(&project, &user.0)))
}

/// Any user may join an active project
///
/// POST /api/v1/projects/:id/join
pub async fn join_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.join(&user.0, id).await?;
    Ok(HalResponse(ProjectRepresenter::represent(&project, &user.0)))
}

/// GET /api/v1/projects/:id/task-activities
pub async fn list_project_task_activities(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.get(&user.0, id).await?;
    let activities = state.task_activities.list_for_project(&user.0, id).await?;
    let can_manage = user.is_admin() || project.is_manager(user.id);

    Ok(HalResponse(TaskActivityRepresenter::represent_collection(
        &activities,
        Some((id, can_manage)),
        &format!("{}/projects/{}/task-activities", API_PREFIX, id),
    )))
}

/// POST /api/v1/projects/:id/task-activities
pub async fn add_project_task_activity(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<CreateTaskActivityDto>,
) -> ApiResult<impl IntoResponse> {
    let activity = state.task_activities.add_to_project(&user.0, id, dto).await?;
    Ok((
        StatusCode::CREATED,
        HalResponse(TaskActivityRepresenter::represent(&activity, Some((id, true)))),
    ))
}

/// DELETE /api/v1/projects/:id/task-activities/:activity_id
pub async fn remove_project_task_activity(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, activity_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    state
        .task_activities
        .remove_from_project(&user.0, id, activity_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
