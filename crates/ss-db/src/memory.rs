//! In-memory store
//!
//! Implements every store trait over plain vectors. Used by service and API
//! tests and by local runs without Postgres.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_models::report::sort_entries;
use ss_models::{Project, Report, ReportEntry, TaskActivityType, User, DEFAULT_TASK_ACTIVITY};

use crate::repository::{
    ProjectRemoval, ProjectStore, ReportFilter, ReportStore, RepositoryError, RepositoryResult,
    RoleChange, TaskActivityStore, UserStore,
};

#[derive(Default)]
struct Tables {
    next_id: Id,
    users: Vec<User>,
    projects: Vec<Project>,
    reports: Vec<Report>,
    activities: Vec<TaskActivityType>,
}

impl Tables {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    /// All or nothing: unknown users fail before any role changes
    fn apply_roles(&mut self, roles: &[RoleChange]) -> RepositoryResult<()> {
        if let Some(missing) = roles
            .iter()
            .find(|change| !self.users.iter().any(|u| u.id == Some(change.user_id)))
        {
            return Err(RepositoryError::not_found("User", missing.user_id));
        }
        let now = Utc::now();
        for change in roles {
            if let Some(user) = self.users.iter_mut().find(|u| u.id == Some(change.user_id)) {
                user.user_type = change.user_type;
                user.updated_at = Some(now);
            }
        }
        Ok(())
    }

    fn check_daily_limit(&self, report: &Report) -> RepositoryResult<()> {
        let booked: WorkHours = self
            .reports
            .iter()
            .filter(|r| r.author_id == report.author_id && r.date == report.date)
            .filter(|r| report.id.is_none() || r.id != report.id)
            .map(|r| r.work_hours)
            .sum();
        if report.work_hours.exceeds_daily_limit(booked) {
            return Err(RepositoryError::DailyLimitExceeded { booked });
        }
        Ok(())
    }
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty store holding only the default task activity
    pub fn new() -> Self {
        let mut tables = Tables::default();
        let mut other = TaskActivityType::default_activity();
        other.id = Some(tables.next_id());
        tables.activities.push(other);
        Self {
            tables: Mutex::new(tables),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<User>> {
        let tables = self.tables.lock();
        Ok(tables.users.iter().find(|u| u.id == Some(id)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let tables = self.tables.lock();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let mut users = self.tables.lock().users.clone();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn find_many(&self, ids: &[Id]) -> RepositoryResult<Vec<User>> {
        let mut users: Vec<User> = self
            .tables
            .lock()
            .users
            .iter()
            .filter(|u| u.id.is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn email_taken(&self, email: &str, exclude: Option<Id>) -> RepositoryResult<bool> {
        let tables = self.tables.lock();
        Ok(tables
            .users
            .iter()
            .any(|u| u.email == email && (exclude.is_none() || u.id != exclude)))
    }

    async fn insert(&self, user: &User) -> RepositoryResult<User> {
        let mut tables = self.tables.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "email {} already exists",
                user.email
            )));
        }
        let mut user = user.clone();
        user.id = Some(tables.next_id());
        user.date_joined = Some(Utc::now());
        user.updated_at = user.date_joined;
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        update_user(&mut self.tables.lock(), user)
    }

    async fn update_and_remove(&self, user: &User, removal: ProjectRemoval) -> RepositoryResult<User> {
        let mut tables = self.tables.lock();
        let updated = update_user(&mut tables, user)?;
        let id = user.id.unwrap_or_default();
        for project in tables.projects.iter_mut() {
            project.managers.retain(|m| *m != id);
            if removal == ProjectRemoval::AllProjects {
                project.members.retain(|m| *m != id);
            }
        }
        Ok(updated)
    }
}

fn update_user(tables: &mut Tables, user: &User) -> RepositoryResult<User> {
    let id = user.id.unwrap_or_default();
    let stored = tables
        .users
        .iter_mut()
        .find(|u| u.id == Some(id))
        .ok_or_else(|| RepositoryError::not_found("User", id))?;
    let password_hash = user.password_hash.clone().or(stored.password_hash.take());
    *stored = User {
        password_hash,
        updated_at: Some(Utc::now()),
        ..user.clone()
    };
    Ok(stored.clone())
}

fn sorted(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    projects
}

fn normalized(project: &Project) -> Project {
    let mut project = project.clone();
    project.managers.sort_unstable();
    project.managers.dedup();
    project.members.sort_unstable();
    project.members.dedup();
    project
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Project>> {
        let tables = self.tables.lock();
        Ok(tables.projects.iter().find(|p| p.id == Some(id)).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<Project>> {
        Ok(sorted(self.tables.lock().projects.clone()))
    }

    async fn list_managed_by(&self, user_id: Id) -> RepositoryResult<Vec<Project>> {
        let tables = self.tables.lock();
        Ok(sorted(
            tables
                .projects
                .iter()
                .filter(|p| p.is_manager(user_id))
                .cloned()
                .collect(),
        ))
    }

    async fn list_joined_by(&self, user_id: Id) -> RepositoryResult<Vec<Project>> {
        let tables = self.tables.lock();
        Ok(sorted(
            tables
                .projects
                .iter()
                .filter(|p| p.is_member(user_id))
                .cloned()
                .collect(),
        ))
    }

    async fn insert(&self, project: &Project, roles: &[RoleChange]) -> RepositoryResult<Project> {
        let mut tables = self.tables.lock();
        tables.apply_roles(roles)?;
        let mut project = normalized(project);
        project.id = Some(tables.next_id());
        project.created_at = Some(Utc::now());
        project.updated_at = project.created_at;
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn update(&self, project: &Project, roles: &[RoleChange]) -> RepositoryResult<Project> {
        let id = project.id.unwrap_or_default();
        let mut tables = self.tables.lock();
        if !tables.projects.iter().any(|p| p.id == Some(id)) {
            return Err(RepositoryError::not_found("Project", id));
        }
        tables.apply_roles(roles)?;
        let stored = tables
            .projects
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found("Project", id))?;
        *stored = normalized(project);
        stored.updated_at = Some(Utc::now());
        Ok(stored.clone())
    }

    async fn delete(&self, id: Id, roles: &[RoleChange]) -> RepositoryResult<()> {
        let mut tables = self.tables.lock();
        if !tables.projects.iter().any(|p| p.id == Some(id)) {
            return Err(RepositoryError::not_found("Project", id));
        }
        tables.apply_roles(roles)?;
        tables.projects.retain(|p| p.id != Some(id));
        tables.reports.retain(|r| r.project_id != id);
        for activity in tables.activities.iter_mut() {
            activity.projects.retain(|p| *p != id);
        }
        Ok(())
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Report>> {
        let tables = self.tables.lock();
        Ok(tables.reports.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn list(&self, filter: &ReportFilter) -> RepositoryResult<Vec<ReportEntry>> {
        let tables = self.tables.lock();
        let name_of = |items: &[(Option<Id>, &str)], id: Id| {
            items
                .iter()
                .find(|(item_id, _)| *item_id == Some(id))
                .map(|(_, name)| name.to_string())
                .unwrap_or_default()
        };
        let projects: Vec<(Option<Id>, &str)> =
            tables.projects.iter().map(|p| (p.id, p.name.as_str())).collect();
        let activities: Vec<(Option<Id>, &str)> =
            tables.activities.iter().map(|a| (a.id, a.name.as_str())).collect();
        let users: Vec<(Option<Id>, &str)> =
            tables.users.iter().map(|u| (u.id, u.email.as_str())).collect();

        let mut entries: Vec<ReportEntry> = tables
            .reports
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| ReportEntry {
                report: r.clone(),
                project_name: name_of(&projects, r.project_id),
                task_activity_name: name_of(&activities, r.task_activity_id),
                author_email: name_of(&users, r.author_id),
            })
            .collect();
        sort_entries(&mut entries);
        Ok(entries)
    }

    async fn daily_hours(
        &self,
        author_id: Id,
        date: NaiveDate,
        exclude: Option<Id>,
    ) -> RepositoryResult<WorkHours> {
        let tables = self.tables.lock();
        Ok(tables
            .reports
            .iter()
            .filter(|r| r.author_id == author_id && r.date == date)
            .filter(|r| exclude.is_none() || r.id != exclude)
            .map(|r| r.work_hours)
            .sum())
    }

    async fn insert(&self, report: &Report) -> RepositoryResult<Report> {
        let mut tables = self.tables.lock();
        tables.check_daily_limit(report)?;
        let mut report = report.clone();
        report.id = Some(tables.next_id());
        report.creation_date = Some(Utc::now());
        report.last_update = report.creation_date;
        tables.reports.push(report.clone());
        Ok(report)
    }

    async fn update(&self, report: &Report) -> RepositoryResult<Report> {
        let id = report.id.unwrap_or_default();
        let mut tables = self.tables.lock();
        tables.check_daily_limit(report)?;
        let stored = tables
            .reports
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found("Report", id))?;
        *stored = report.clone();
        stored.last_update = Some(Utc::now());
        Ok(stored.clone())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let mut tables = self.tables.lock();
        let before = tables.reports.len();
        tables.reports.retain(|r| r.id != Some(id));
        if tables.reports.len() == before {
            return Err(RepositoryError::not_found("Report", id));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskActivityStore for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<TaskActivityType>> {
        let tables = self.tables.lock();
        Ok(tables.activities.iter().find(|a| a.id == Some(id)).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<TaskActivityType>> {
        let mut activities = self.tables.lock().activities.clone();
        activities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(activities)
    }

    async fn list_for_project(&self, project_id: Id) -> RepositoryResult<Vec<TaskActivityType>> {
        let mut activities: Vec<TaskActivityType> = self
            .tables
            .lock()
            .activities
            .iter()
            .filter(|a| a.available_in(project_id))
            .cloned()
            .collect();
        activities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(activities)
    }

    async fn get_or_create(&self, name: &str, is_default: bool) -> RepositoryResult<TaskActivityType> {
        let mut tables = self.tables.lock();
        if let Some(existing) = tables.activities.iter().find(|a| a.name == name) {
            return Ok(existing.clone());
        }
        let mut activity = TaskActivityType::new(name);
        activity.is_default = is_default || name == DEFAULT_TASK_ACTIVITY;
        activity.id = Some(tables.next_id());
        tables.activities.push(activity.clone());
        Ok(activity)
    }

    async fn attach(&self, project_id: Id, activity_id: Id) -> RepositoryResult<()> {
        let mut tables = self.tables.lock();
        let activity = tables
            .activities
            .iter_mut()
            .find(|a| a.id == Some(activity_id))
            .ok_or_else(|| RepositoryError::not_found("TaskActivityType", activity_id))?;
        if !activity.projects.contains(&project_id) {
            activity.projects.push(project_id);
        }
        Ok(())
    }

    async fn detach(&self, project_id: Id, activity_id: Id) -> RepositoryResult<()> {
        let mut tables = self.tables.lock();
        if let Some(activity) = tables.activities.iter_mut().find(|a| a.id == Some(activity_id)) {
            activity.projects.retain(|p| *p != project_id);
        }
        Ok(())
    }
}
