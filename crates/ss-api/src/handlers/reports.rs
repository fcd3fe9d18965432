//! Report API handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_models::{CreateReportDto, Report, ReportEntry, UpdateReportDto};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, HalResponse, MonthQuery, Pagination};
use crate::representers::hal::{rels, HalCollection, HalLink, HalResource, API_PREFIX};
use crate::representers::report::ReportRepresentation;
use crate::representers::{ReportNames, ReportRepresenter};

/// Link titles for a single report; lookups that fail leave the title out
async fn names_for(state: &AppState, report: &Report) -> ReportNames {
    ReportNames {
        project: state.projects.find(report.project_id).await.ok().map(|p| p.name),
        task_activity: state
            .task_activities
            .find(report.task_activity_id)
            .await
            .ok()
            .map(|a| a.name),
        author: state.users.find(report.author_id).await.ok().map(|u| u.email),
    }
}

fn month_collection(
    entries: Vec<ReportEntry>,
    path: &str,
    month: &MonthQuery,
    pagination: &Pagination,
) -> HalCollection<HalResource<ReportRepresentation>> {
    let total = entries.len() as i64;
    let page = pagination.apply(entries);
    let base_url = format!(
        "{}{}?year={}&month={}",
        API_PREFIX, path, month.year, month.month
    );
    ReportRepresenter::represent_collection(
        &page,
        total,
        pagination.offset,
        pagination.page_size,
        &base_url,
    )
}

/// The month's reports visible to the user
///
/// GET /api/v1/reports?year&month
pub async fn list_reports(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    month: MonthQuery,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let entries = state
        .reports
        .list_for_month(&user.0, month.year, month.month)
        .await?;
    Ok(HalResponse(month_collection(entries, "/reports", &month, &pagination)))
}

/// POST /api/v1/reports
pub async fn create_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateReportDto>,
) -> ApiResult<impl IntoResponse> {
    let report = state.reports.create(&user.0, dto).await?;
    let names = names_for(&state, &report).await;
    Ok((
        StatusCode::CREATED,
        HalResponse(ReportRepresenter::represent(&report, &names)),
    ))
}

/// GET /api/v1/reports/:id
pub async fn get_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let report = state.reports.get(&user.0, id).await?;
    let names = names_for(&state, &report).await;
    Ok(HalResponse(ReportRepresenter::represent(&report, &names)))
}

/// PATCH /api/v1/reports/:id
pub async fn update_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateReportDto>,
) -> ApiResult<impl IntoResponse> {
    let report = state.reports.update(&user.0, id, dto).await?;
    let names = names_for(&state, &report).await;
    Ok(HalResponse(ReportRepresenter::represent(&report, &names)))
}

/// DELETE /api/v1/reports/:id
pub async fn delete_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    state.reports.delete(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/reports/author/:id?year&month
pub async fn list_author_reports(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(author_id): Path<Id>,
    month: MonthQuery,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let entries = state
        .reports
        .list_for_author(&user.0, author_id, month.year, month.month)
        .await?;
    let path = format!("/reports/author/{}", author_id);
    Ok(HalResponse(month_collection(entries, &path, &month, &pagination)))
}

/// GET /api/v1/reports/project/:id?year&month
pub async fn list_project_reports(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
    month: MonthQuery,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let entries = state
        .reports
        .list_for_project(&user.0, project_id, month.year, month.month)
        .await?;
    let path = format!("/reports/project/{}", project_id);
    Ok(HalResponse(month_collection(entries, &path, &month, &pagination)))
}

/// GET /api/v1/reports/project/:id/author/:user_id?year&month
pub async fn list_project_author_reports(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((project_id, author_id)): Path<(Id, Id)>,
    month: MonthQuery,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let entries = state
        .reports
        .list_for_project_author(&user.0, project_id, author_id, month.year, month.month)
        .await?;
    let path = format!("/reports/project/{}/author/{}", project_id, author_id);
    Ok(HalResponse(month_collection(entries, &path, &month, &pagination)))
}

/// Share of the user's hours per project
///
/// GET /api/v1/reports/statistics/work-percentage?year&month
pub async fn work_percentage(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    month: MonthQuery,
) -> ApiResult<impl IntoResponse> {
    let shares = state
        .reports
        .projects_work_percentage(&user.0, user.id, month.year, month.month)
        .await?;
    let total = shares.len() as i64;
    let href = format!(
        "{}/reports/statistics/work-percentage?year={}&month={}",
        API_PREFIX, month.year, month.month
    );
    Ok(HalResponse(
        HalCollection::new("ProjectWorkShareCollection", shares, total, total.max(1), 0)
            .with_link(rels::SELF, HalLink::new(href)),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursPerDate {
    pub year: i32,
    pub month: u32,
    pub total: WorkHours,
    pub dates: BTreeMap<NaiveDate, WorkHours>,
}

/// Summed hours of each day the user reported in the month
///
/// GET /api/v1/reports/hours-per-date?year&month
pub async fn hours_per_date(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    month: MonthQuery,
) -> ApiResult<impl IntoResponse> {
    let dates = state
        .reports
        .work_hours_per_date(&user.0, month.year, month.month)
        .await?;
    let body = HoursPerDate {
        year: month.year,
        month: month.month,
        total: dates.values().sum(),
        dates,
    };
    Ok(HalResponse(
        HalResource::new("HoursPerDate", body).with_self_link(format!(
            "{}/reports/hours-per-date?year={}&month={}",
            API_PREFIX, month.year, month.month
        )),
    ))
}

#[derive(Debug, Deserialize)]
pub struct DailyHoursQuery {
    pub date: Option<NaiveDate>,
    pub author: Option<Id>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHours {
    pub author_id: Id,
    pub date: NaiveDate,
    pub work_hours: WorkHours,
    pub remaining: WorkHours,
}

/// Hours already booked on a day, today by default
///
/// GET /api/v1/reports/daily-hours?date&author
pub async fn daily_hours(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<DailyHoursQuery>,
) -> ApiResult<impl IntoResponse> {
    let author_id = query.author.unwrap_or(user.id);
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());
    let work_hours = state.reports.daily_hours(&user.0, author_id, date).await?;
    let body = DailyHours {
        author_id,
        date,
        work_hours,
        remaining: WorkHours::MAX_DAILY.saturating_sub(work_hours),
    };
    Ok(HalResponse(HalResource::new("DailyHours", body)))
}
