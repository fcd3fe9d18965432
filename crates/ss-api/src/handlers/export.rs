//! Monthly report downloads

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use ss_core::error::SsError;
use ss_core::traits::Id;
use ss_export::{ExportError, ExportFile, ExportFormat};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, MonthQuery};

fn attachment(file: ExportFile) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
}

/// A user's month as xlsx or csv
///
/// GET /api/v1/export/user/:id?year&month&format
pub async fn export_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Id>,
    month: MonthQuery,
) -> ApiResult<impl IntoResponse> {
    if month.format == ExportFormat::Zip {
        return Err(ExportError::UnsupportedFormat(month.format.to_string()).into());
    }
    let period = month.period()?;
    let entries = state
        .reports
        .list_for_user_export(&user.0, user_id, month.year, month.month)
        .await?;
    let author = state.users.find(user_id).await?;

    let file = ss_export::export_user(&author, period, &entries, month.format)?;
    tracing::info!("User {} exported reports of {} for {}", user.id, author.email, period);
    Ok(attachment(file))
}

/// One sheet per project member
///
/// GET /api/v1/export/project/:id?year&month&format
pub async fn export_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
    month: MonthQuery,
) -> ApiResult<impl IntoResponse> {
    let period = month.period()?;
    let entries = state
        .reports
        .list_for_project(&user.0, project_id, month.year, month.month)
        .await?;
    let project = state.projects.find(project_id).await?;
    let members = state
        .stores
        .users
        .find_many(&project.members)
        .await
        .map_err(SsError::from)?;

    let file = ss_export::export_project(&project, &members, period, &entries, month.format)?;
    tracing::info!("User {} exported project {} for {}", user.id, project.name, period);
    Ok(attachment(file))
}

/// A single member's reports within a project
///
/// GET /api/v1/export/project/:id/author/:user_id?year&month&format
pub async fn export_project_author(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((project_id, author_id)): Path<(Id, Id)>,
    month: MonthQuery,
) -> ApiResult<impl IntoResponse> {
    let period = month.period()?;
    let entries = state
        .reports
        .list_for_project_author(&user.0, project_id, author_id, month.year, month.month)
        .await?;
    let project = state.projects.find(project_id).await?;
    let author = state.users.find(author_id).await?;

    let file = ss_export::export_project_author(&project, &author, period, &entries, month.format)?;
    Ok(attachment(file))
}
