//! Report repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_models::{Report, ReportEntry};

use crate::repository::{
    ReportFilter, ReportScope, ReportStore, RepositoryError, RepositoryResult,
};

const REPORT_COLUMNS: &str = "id, date, description, author_id, project_id, task_activity_id, \
     work_hours_minutes, editable, creation_date, last_update";

/// Report database entity
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub author_id: i64,
    pub project_id: i64,
    pub task_activity_id: i64,
    pub work_hours_minutes: i32,
    pub editable: bool,
    pub creation_date: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Report {
            id: Some(row.id),
            date: row.date,
            description: row.description,
            author_id: row.author_id,
            project_id: row.project_id,
            task_activity_id: row.task_activity_id,
            work_hours: WorkHours::from_minutes(i64::from(row.work_hours_minutes)),
            editable: row.editable,
            creation_date: Some(row.creation_date),
            last_update: Some(row.last_update),
        }
    }
}

/// A report row joined with project, activity and author names
#[derive(Debug, Clone, FromRow)]
pub struct ReportEntryRow {
    #[sqlx(flatten)]
    pub report: ReportRow,
    pub project_name: String,
    pub task_activity_name: String,
    pub author_email: String,
}

impl From<ReportEntryRow> for ReportEntry {
    fn from(row: ReportEntryRow) -> Self {
        ReportEntry {
            report: row.report.into(),
            project_name: row.project_name,
            task_activity_name: row.task_activity_name,
            author_email: row.author_email,
        }
    }
}

/// Lowers a scope to the optional author, optional project set and the
/// connective the listing query combines them with
fn scope_params(scope: &ReportScope) -> (Option<Id>, Option<Vec<Id>>, bool) {
    match scope {
        ReportScope::All => (None, None, false),
        ReportScope::Author(author_id) => (Some(*author_id), None, false),
        ReportScope::Project(project_id) => (None, Some(vec![*project_id]), false),
        ReportScope::ProjectAuthor {
            project_id,
            author_id,
        } => (Some(*author_id), Some(vec![*project_id]), false),
        ReportScope::AuthorOrProjects {
            author_id,
            project_ids,
        } => (Some(*author_id), Some(project_ids.clone()), true),
    }
}

fn minutes(work_hours: WorkHours) -> RepositoryResult<i32> {
    i32::try_from(work_hours.minutes())
        .map_err(|_| RepositoryError::Conflict(format!("work hours {} out of range", work_hours)))
}

pub async fn insert_report<'e, E: PgExecutor<'e>>(
    executor: E,
    report: &Report,
) -> RepositoryResult<Report> {
    let row = sqlx::query_as::<_, ReportRow>(&format!(
        r#"
        INSERT INTO reports (
            date, description, author_id, project_id, task_activity_id,
            work_hours_minutes, editable, creation_date, last_update
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, NOW(), NOW()
        )
        RETURNING {REPORT_COLUMNS}
        "#
    ))
    .bind(report.date)
    .bind(&report.description)
    .bind(report.author_id)
    .bind(report.project_id)
    .bind(report.task_activity_id)
    .bind(minutes(report.work_hours)?)
    .bind(report.editable)
    .fetch_one(executor)
    .await?;

    Ok(row.into())
}

async fn booked_hours<'e, E: PgExecutor<'e>>(
    executor: E,
    author_id: Id,
    date: NaiveDate,
    exclude: Option<Id>,
) -> RepositoryResult<WorkHours> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(work_hours_minutes), 0)::BIGINT
        FROM reports
        WHERE author_id = $1 AND date = $2 AND ($3::BIGINT IS NULL OR id <> $3)
        "#,
    )
    .bind(author_id)
    .bind(date)
    .bind(exclude)
    .fetch_one(executor)
    .await?;

    Ok(WorkHours::from_minutes(total))
}

/// Locks the author row so concurrent writes for the same author queue up,
/// then checks the day's total against the daily limit
async fn reserve_daily_hours(conn: &mut PgConnection, report: &Report) -> RepositoryResult<()> {
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(report.author_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("User", report.author_id))?;

    let booked = booked_hours(&mut *conn, report.author_id, report.date, report.id).await?;
    if report.work_hours.exceeds_daily_limit(booked) {
        return Err(RepositoryError::DailyLimitExceeded { booked });
    }
    Ok(())
}

/// Report repository implementation
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for ReportRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Report>> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Report::from))
    }

    async fn list(&self, filter: &ReportFilter) -> RepositoryResult<Vec<ReportEntry>> {
        let (author_id, project_ids, either) = scope_params(&filter.scope);

        let rows = sqlx::query_as::<_, ReportEntryRow>(
            r#"
            SELECT r.id, r.date, r.description, r.author_id, r.project_id, r.task_activity_id,
                   r.work_hours_minutes, r.editable, r.creation_date, r.last_update,
                   p.name AS project_name, t.name AS task_activity_name, u.email AS author_email
            FROM reports r
            JOIN projects p ON p.id = r.project_id
            JOIN task_activity_types t ON t.id = r.task_activity_id
            JOIN users u ON u.id = r.author_id
            WHERE r.date BETWEEN $1 AND $2
              AND CASE WHEN $5
                  THEN (r.author_id = $3 OR r.project_id = ANY($4))
                  ELSE (($3::BIGINT IS NULL OR r.author_id = $3)
                        AND ($4::BIGINT[] IS NULL OR r.project_id = ANY($4)))
              END
            ORDER BY r.date ASC, p.name ASC, r.id ASC
            "#,
        )
        .bind(filter.from)
        .bind(filter.to)
        .bind(author_id)
        .bind(project_ids)
        .bind(either)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReportEntry::from).collect())
    }

    async fn daily_hours(
        &self,
        author_id: Id,
        date: NaiveDate,
        exclude: Option<Id>,
    ) -> RepositoryResult<WorkHours> {
        booked_hours(&self.pool, author_id, date, exclude).await
    }

    async fn insert(&self, report: &Report) -> RepositoryResult<Report> {
        let mut tx = self.pool.begin().await?;
        reserve_daily_hours(&mut tx, report).await?;
        let report = insert_report(&mut *tx, report).await?;
        tx.commit().await?;
        Ok(report)
    }

    async fn update(&self, report: &Report) -> RepositoryResult<Report> {
        let id = report
            .id
            .ok_or_else(|| RepositoryError::Conflict("report has not been saved yet".into()))?;

        let mut tx = self.pool.begin().await?;
        reserve_daily_hours(&mut tx, report).await?;
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            UPDATE reports SET
                date = $1,
                description = $2,
                project_id = $3,
                task_activity_id = $4,
                work_hours_minutes = $5,
                editable = $6,
                last_update = NOW()
            WHERE id = $7
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(report.date)
        .bind(&report.description)
        .bind(report.project_id)
        .bind(report.task_activity_id)
        .bind(minutes(report.work_hours)?)
        .bind(report.editable)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Report", id))?;
        tx.commit().await?;

        Ok(row.into())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Report", id));
        }

        Ok(())
    }
}
