//! Task activity repository

use async_trait::async_trait;
use sqlx::{FromRow, PgExecutor, PgPool};
use ss_core::traits::Id;
use ss_models::TaskActivityType;

use crate::repository::{RepositoryResult, TaskActivityStore};

const ACTIVITY_SELECT: &str = r#"
    SELECT t.id, t.name, t.is_default,
           ARRAY(SELECT project_id FROM project_task_activities WHERE task_activity_id = t.id ORDER BY project_id) AS projects
    FROM task_activity_types t
"#;

#[derive(Debug, Clone, FromRow)]
pub struct TaskActivityRow {
    pub id: i64,
    pub name: String,
    pub is_default: bool,
    pub projects: Vec<i64>,
}

impl From<TaskActivityRow> for TaskActivityType {
    fn from(row: TaskActivityRow) -> Self {
        TaskActivityType {
            id: Some(row.id),
            name: row.name,
            is_default: row.is_default,
            projects: row.projects,
        }
    }
}

/// Fetch the activity named `name`, creating it when missing
pub async fn get_or_create_activity<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    is_default: bool,
) -> RepositoryResult<TaskActivityType> {
    // The no-op update makes RETURNING yield the existing row on conflict
    let row = sqlx::query_as::<_, TaskActivityRow>(
        r#"
        WITH upserted AS (
            INSERT INTO task_activity_types (name, is_default)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, is_default
        )
        SELECT u.id, u.name, u.is_default,
               ARRAY(SELECT project_id FROM project_task_activities WHERE task_activity_id = u.id ORDER BY project_id) AS projects
        FROM upserted u
        "#,
    )
    .bind(name)
    .bind(is_default)
    .fetch_one(executor)
    .await?;

    Ok(row.into())
}

pub async fn attach_activity<'e, E: PgExecutor<'e>>(
    executor: E,
    project_id: Id,
    activity_id: Id,
) -> RepositoryResult<()> {
    sqlx::query(
        "INSERT INTO project_task_activities (project_id, task_activity_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(project_id)
    .bind(activity_id)
    .execute(executor)
    .await?;
    Ok(())
}

#[derive(Clone)]
pub struct TaskActivityRepository {
    pool: PgPool,
}

impl TaskActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskActivityStore for TaskActivityRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<TaskActivityType>> {
        let row = sqlx::query_as::<_, TaskActivityRow>(&format!("{ACTIVITY_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(TaskActivityType::from))
    }

    async fn list(&self) -> RepositoryResult<Vec<TaskActivityType>> {
        let rows = sqlx::query_as::<_, TaskActivityRow>(&format!("{ACTIVITY_SELECT} ORDER BY t.name ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TaskActivityType::from).collect())
    }

    async fn list_for_project(&self, project_id: Id) -> RepositoryResult<Vec<TaskActivityType>> {
        let rows = sqlx::query_as::<_, TaskActivityRow>(&format!(
            r#"{ACTIVITY_SELECT}
            WHERE t.is_default
               OR EXISTS(SELECT 1 FROM project_task_activities pt
                         WHERE pt.task_activity_id = t.id AND pt.project_id = $1)
            ORDER BY t.name ASC"#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TaskActivityType::from).collect())
    }

    async fn get_or_create(&self, name: &str, is_default: bool) -> RepositoryResult<TaskActivityType> {
        get_or_create_activity(&self.pool, name, is_default).await
    }

    async fn attach(&self, project_id: Id, activity_id: Id) -> RepositoryResult<()> {
        attach_activity(&self.pool, project_id, activity_id).await
    }

    async fn detach(&self, project_id: Id, activity_id: Id) -> RepositoryResult<()> {
        sqlx::query(
            "DELETE FROM project_task_activities WHERE project_id = $1 AND task_activity_id = $2",
        )
        .bind(project_id)
        .bind(activity_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
