//! Project repository
//!
//! Managers and members live in join tables and are loaded as id arrays.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use ss_core::traits::Id;
use ss_models::Project;

use crate::repository::{ProjectStore, RepositoryError, RepositoryResult, RoleChange};
use crate::users::set_user_type;

const PROJECT_SELECT: &str = r#"
    SELECT p.id, p.name, p.start_date, p.stop_date, p.suspended, p.created_at, p.updated_at,
           ARRAY(SELECT user_id FROM project_managers WHERE project_id = p.id ORDER BY user_id) AS managers,
           ARRAY(SELECT user_id FROM project_members WHERE project_id = p.id ORDER BY user_id) AS members
    FROM projects p
"#;

/// Project database entity
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub stop_date: Option<NaiveDate>,
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub managers: Vec<i64>,
    pub members: Vec<i64>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: Some(row.id),
            name: row.name,
            start_date: row.start_date,
            stop_date: row.stop_date,
            suspended: row.suspended,
            managers: row.managers,
            members: row.members,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

async fn replace_people(conn: &mut PgConnection, project: &Project, id: Id) -> RepositoryResult<()> {
    sqlx::query("DELETE FROM project_managers WHERE project_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM project_members WHERE project_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "INSERT INTO project_managers (project_id, user_id) SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
    )
    .bind(id)
    .bind(&project.managers)
    .execute(&mut *conn)
    .await?;
    sqlx::query(
        "INSERT INTO project_members (project_id, user_id) SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
    )
    .bind(id)
    .bind(&project.members)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn apply_roles(conn: &mut PgConnection, roles: &[RoleChange]) -> RepositoryResult<()> {
    for change in roles {
        set_user_type(&mut *conn, change.user_id, change.user_type).await?;
    }
    Ok(())
}

async fn fetch_project<'e, E: PgExecutor<'e>>(executor: E, id: Id) -> RepositoryResult<Option<Project>> {
    let row = sqlx::query_as::<_, ProjectRow>(&format!("{PROJECT_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Project::from))
}

/// Insert a project with its people on an open connection or transaction
pub async fn insert_project(conn: &mut PgConnection, project: &Project) -> RepositoryResult<Project> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO projects (name, start_date, stop_date, suspended, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        RETURNING id
        "#,
    )
    .bind(&project.name)
    .bind(project.start_date)
    .bind(project.stop_date)
    .bind(project.suspended)
    .fetch_one(&mut *conn)
    .await?;

    replace_people(conn, project, id).await?;

    fetch_project(&mut *conn, id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Project", id))
}

pub async fn existing_names<'e, E: PgExecutor<'e>>(executor: E) -> RepositoryResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>("SELECT name FROM projects")
        .fetch_all(executor)
        .await?;
    Ok(names)
}

/// All projects, for seeding and bulk jobs
pub async fn all_projects<'e, E: PgExecutor<'e>>(executor: E) -> RepositoryResult<Vec<Project>> {
    let rows = sqlx::query_as::<_, ProjectRow>(&format!("{PROJECT_SELECT} ORDER BY p.name ASC"))
        .fetch_all(executor)
        .await?;
    Ok(rows.into_iter().map(Project::from).collect())
}

/// Project repository implementation
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, condition: &str, user_id: Id) -> RepositoryResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "{PROJECT_SELECT} WHERE {condition} ORDER BY p.name ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Project>> {
        fetch_project(&self.pool, id).await
    }

    async fn list(&self) -> RepositoryResult<Vec<Project>> {
        all_projects(&self.pool).await
    }

    async fn list_managed_by(&self, user_id: Id) -> RepositoryResult<Vec<Project>> {
        self.list_where(
            "EXISTS(SELECT 1 FROM project_managers pm WHERE pm.project_id = p.id AND pm.user_id = $1)",
            user_id,
        )
        .await
    }

    async fn list_joined_by(&self, user_id: Id) -> RepositoryResult<Vec<Project>> {
        self.list_where(
            "EXISTS(SELECT 1 FROM project_members pm WHERE pm.project_id = p.id AND pm.user_id = $1)",
            user_id,
        )
        .await
    }

    async fn insert(&self, project: &Project, roles: &[RoleChange]) -> RepositoryResult<Project> {
        let mut tx = self.pool.begin().await?;
        let project = insert_project(&mut tx, project).await?;
        apply_roles(&mut tx, roles).await?;
        tx.commit().await?;
        Ok(project)
    }

    async fn update(&self, project: &Project, roles: &[RoleChange]) -> RepositoryResult<Project> {
        let id = project
            .id
            .ok_or_else(|| RepositoryError::Conflict("project has not been saved yet".into()))?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                name = $1,
                start_date = $2,
                stop_date = $3,
                suspended = $4,
                updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(&project.name)
        .bind(project.start_date)
        .bind(project.stop_date)
        .bind(project.suspended)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Project", id));
        }

        replace_people(&mut tx, project, id).await?;
        apply_roles(&mut tx, roles).await?;
        let updated = fetch_project(&mut *tx, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Project", id))?;
        tx.commit().await?;

        Ok(updated)
    }

    async fn delete(&self, id: Id, roles: &[RoleChange]) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Project", id));
        }

        apply_roles(&mut tx, roles).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_keeps_people() {
        let row = ProjectRow {
            id: 5,
            name: "Time Monkey".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            stop_date: None,
            suspended: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            managers: vec![1],
            members: vec![1, 2],
        };
        let project = Project::from(row);
        assert_eq!(project.id, Some(5));
        assert!(project.is_manager(1));
        assert!(project.is_member(2));
        assert!(!project.is_active());
    }
}
