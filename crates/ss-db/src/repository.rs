//! Repository traits shared by the Postgres and in-memory stores
//!
//! Services only see these traits, so they can run against either backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use ss_core::error::SsError;
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_core::error::ValidationErrors;
use ss_models::{Project, Report, ReportEntry, TaskActivityType, User, UserType};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Id },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Corrupt row: {0}")]
    Decode(String),

    /// The author's day already holds `booked` and the write would pass 24:00
    #[error("Daily limit exceeded, {booked} already booked")]
    DailyLimitExceeded { booked: WorkHours },
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        RepositoryError::NotFound { entity, id }
    }
}

impl From<RepositoryError> for SsError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => SsError::not_found(entity, id),
            RepositoryError::Conflict(message) => SsError::Conflict { message },
            RepositoryError::DailyLimitExceeded { booked } => SsError::Validation(
                ValidationErrors::single("work_hours", WorkHours::daily_limit_message(booked)),
            ),
            RepositoryError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                SsError::Conflict {
                    message: db.message().to_string(),
                }
            }
            other => SsError::Database(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// A role a user moves to in the same transaction as a project write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChange {
    pub user_id: Id,
    pub user_type: UserType,
}

/// Project rows dropped together with a user update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRemoval {
    /// Manager entries only, membership stays
    ManagerRoles,
    /// Manager and member entries in every project
    AllProjects,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<User>>;

    /// Emails are stored lowercased; callers pass a normalised address
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Every user, ordered by email
    async fn list(&self) -> RepositoryResult<Vec<User>>;

    async fn find_many(&self, ids: &[Id]) -> RepositoryResult<Vec<User>>;

    async fn email_taken(&self, email: &str, exclude: Option<Id>) -> RepositoryResult<bool>;

    async fn insert(&self, user: &User) -> RepositoryResult<User>;

    async fn update(&self, user: &User) -> RepositoryResult<User>;

    /// Updates the user and drops their project rows in one transaction
    async fn update_and_remove(&self, user: &User, removal: ProjectRemoval) -> RepositoryResult<User>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Project>>;

    /// Every project, ordered by name
    async fn list(&self) -> RepositoryResult<Vec<Project>>;

    async fn list_managed_by(&self, user_id: Id) -> RepositoryResult<Vec<Project>>;

    async fn list_joined_by(&self, user_id: Id) -> RepositoryResult<Vec<Project>>;

    /// Inserts the project together with its manager and member sets.
    /// `roles` are applied in the same transaction.
    async fn insert(&self, project: &Project, roles: &[RoleChange]) -> RepositoryResult<Project>;

    /// Replaces the project's columns and its manager and member sets,
    /// applying `roles` in the same transaction
    async fn update(&self, project: &Project, roles: &[RoleChange]) -> RepositoryResult<Project>;

    /// Deletes the project and its reports, applying `roles` in the same
    /// transaction
    async fn delete(&self, id: Id, roles: &[RoleChange]) -> RepositoryResult<()>;
}

/// Which reports a listing covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Author(Id),
    Project(Id),
    ProjectAuthor { project_id: Id, author_id: Id },
    /// Own reports plus every report in the given projects
    AuthorOrProjects { author_id: Id, project_ids: Vec<Id> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub scope: ReportScope,
}

impl ReportFilter {
    pub fn new(from: NaiveDate, to: NaiveDate, scope: ReportScope) -> Self {
        Self { from, to, scope }
    }

    pub fn matches(&self, report: &Report) -> bool {
        if report.date < self.from || report.date > self.to {
            return false;
        }
        match &self.scope {
            ReportScope::All => true,
            ReportScope::Author(author_id) => report.author_id == *author_id,
            ReportScope::Project(project_id) => report.project_id == *project_id,
            ReportScope::ProjectAuthor {
                project_id,
                author_id,
            } => report.project_id == *project_id && report.author_id == *author_id,
            ReportScope::AuthorOrProjects {
                author_id,
                project_ids,
            } => report.author_id == *author_id || project_ids.contains(&report.project_id),
        }
    }
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Report>>;

    /// Reports joined with their names, ordered by date then project name
    async fn list(&self, filter: &ReportFilter) -> RepositoryResult<Vec<ReportEntry>>;

    /// Hours the author booked on `date`, leaving out `exclude`
    async fn daily_hours(
        &self,
        author_id: Id,
        date: NaiveDate,
        exclude: Option<Id>,
    ) -> RepositoryResult<WorkHours>;

    /// Fails with [`RepositoryError::DailyLimitExceeded`] when the author's
    /// day would pass [`WorkHours::MAX_DAILY`]. Check and write are atomic.
    async fn insert(&self, report: &Report) -> RepositoryResult<Report>;

    /// Same daily limit as [`ReportStore::insert`], not counting the stored row
    async fn update(&self, report: &Report) -> RepositoryResult<Report>;

    async fn delete(&self, id: Id) -> RepositoryResult<()>;
}

#[async_trait]
pub trait TaskActivityStore: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<TaskActivityType>>;

    /// Every activity, ordered by name
    async fn list(&self) -> RepositoryResult<Vec<TaskActivityType>>;

    /// The default activity plus those attached to the project
    async fn list_for_project(&self, project_id: Id) -> RepositoryResult<Vec<TaskActivityType>>;

    async fn get_or_create(&self, name: &str, is_default: bool) -> RepositoryResult<TaskActivityType>;

    async fn attach(&self, project_id: Id, activity_id: Id) -> RepositoryResult<()>;

    async fn detach(&self, project_id: Id, activity_id: Id) -> RepositoryResult<()>;
}
