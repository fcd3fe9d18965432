//! Random users, projects and reports, written in one transaction

use std::collections::{BTreeMap, HashSet};

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use fake::faker::company::en::{Buzzword, CompanyName};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::seq::IndexedRandom;
use rand::Rng;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use ss_auth::hash_password;
use ss_core::period::MonthPeriod;
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_db::{projects, reports, task_activities, users};
use ss_models::{Project, ProjectStatus, Report, User, UserType, DEFAULT_TASK_ACTIVITY};

use crate::presets::DataSet;

/// Password of every generated account
pub const GENERATED_PASSWORD: &str = "passwduser";

pub const TASK_ACTIVITIES: [&str; 17] = [
    "Backend Development",
    "Frontend Development",
    "Mobile Development",
    "Database Design",
    "DevOps",
    "Testing",
    "Code Review",
    "Review",
    "Documentation",
    "Meeting",
    "Planning",
    "Research",
    "Design",
    "Deployment",
    "Support",
    "Training",
    "Bug Fixing",
];

pub const MAX_MEMBERS_PER_PROJECT: usize = 8;
pub const MAX_MANAGERS_PER_PROJECT: usize = 2;
pub const MAX_REPORTS_PER_DAY: i64 = 3;
const MAX_ACTIVITIES_PER_PROJECT: usize = 5;

const NAME_MAX_LENGTH: usize = 30;
const PROJECT_NAME_MAX_LENGTH: usize = 64;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// What a run inserted
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub users: usize,
    pub projects: usize,
    pub reports: usize,
}

/// `user.<type><n>@codepoets.it`, lowercased
pub fn user_email(kind: &str, number: i64) -> String {
    format!("user.{kind}{number}@codepoets.it").to_lowercase()
}

pub fn projects_to_create(target: i64, existing: i64) -> i64 {
    (target - existing).max(0)
}

/// Random length strictly below a day split into `reports_per_day` parts
pub fn random_work_hours<R: Rng + ?Sized>(rng: &mut R, reports_per_day: i64) -> WorkHours {
    let limit = MINUTES_PER_DAY / reports_per_day.max(1);
    WorkHours::from_minutes(rng.random_range(1..limit.max(2)))
}

/// Start date, stop date and suspended flag of a new project
pub fn project_dates<R: Rng + ?Sized>(
    rng: &mut R,
    status: ProjectStatus,
    today: NaiveDate,
) -> (NaiveDate, Option<NaiveDate>, bool) {
    let start = today - Duration::days(rng.random_range(30..=730));
    match status {
        ProjectStatus::Active => (start, None, false),
        ProjectStatus::Suspended => (start, None, true),
        ProjectStatus::Completed => {
            let length = (today - start).num_days();
            let stop = start + Duration::days(rng.random_range(1..length));
            (start, Some(stop), false)
        }
    }
}

/// Between zero and `max` distinct ids
pub fn pick_some<R: Rng + ?Sized>(rng: &mut R, ids: &[Id], max: usize) -> Vec<Id> {
    let count = rng.random_range(0..=max.min(ids.len()));
    ids.choose_multiple(rng, count).copied().collect()
}

fn truncated(value: String, max: usize) -> String {
    value.chars().take(max).collect()
}

fn random_user(email: String, user_type: UserType, password_hash: &str) -> User {
    let mut user = User::new(email, user_type);
    user.first_name = truncated(FirstName().fake(), NAME_MAX_LENGTH);
    user.last_name = truncated(LastName().fake(), NAME_MAX_LENGTH);
    user.password_hash = Some(password_hash.to_string());
    user
}

fn status_counts(set: &DataSet) -> [(ProjectStatus, i64); 3] {
    [
        (ProjectStatus::Suspended, set.suspended_projects),
        (ProjectStatus::Active, set.active_projects),
        (ProjectStatus::Completed, set.completed_projects),
    ]
}

pub struct Generator<R> {
    rng: R,
    today: NaiveDate,
    password_hash: String,
    summary: Summary,
}

impl<R: Rng> Generator<R> {
    pub fn new(rng: R) -> anyhow::Result<Self> {
        let password_hash =
            hash_password(GENERATED_PASSWORD).context("Failed to hash the generated password")?;
        Ok(Self {
            rng,
            today: Utc::now().date_naive(),
            password_hash,
            summary: Summary::default(),
        })
    }

    /// Runs every step in one transaction
    pub async fn run(mut self, pool: &PgPool, set: &DataSet) -> anyhow::Result<Summary> {
        let mut tx = pool.begin().await?;

        self.create_users(&mut tx, set).await?;
        let activities = self.create_task_activities(&mut tx).await?;
        let created = self.create_projects(&mut tx, set, &activities).await?;
        self.create_reports(&mut tx, &created).await?;

        tx.commit().await?;
        Ok(self.summary)
    }

    async fn create_users(&mut self, conn: &mut PgConnection, set: &DataSet) -> anyhow::Result<()> {
        let mut existing: HashSet<String> =
            users::existing_emails(&mut *conn).await?.into_iter().collect();

        for (user_type, count) in [
            (UserType::Admin, set.admins),
            (UserType::Employee, set.employees),
            (UserType::Manager, set.managers),
        ] {
            let kind = user_type.as_str().to_lowercase();
            for number in 1..=count {
                let email = user_email(&kind, number);
                if !existing.insert(email.clone()) {
                    continue;
                }
                debug!("{} {}(s) left to create", count - number + 1, kind);
                users::insert_user(&mut *conn, &random_user(email, user_type, &self.password_hash))
                    .await?;
                self.summary.users += 1;
            }
        }

        if set.superuser && !users::superuser_exists(&mut *conn).await? {
            let email = user_email("superuser", 1);
            if existing.insert(email.clone()) {
                let mut user = random_user(email, UserType::Admin, &self.password_hash);
                user.is_staff = true;
                user.is_superuser = true;
                users::insert_user(&mut *conn, &user).await?;
                self.summary.users += 1;
            }
        }
        Ok(())
    }

    async fn create_task_activities(&mut self, conn: &mut PgConnection) -> anyhow::Result<Vec<Id>> {
        let mut ids = Vec::with_capacity(TASK_ACTIVITIES.len());
        for name in TASK_ACTIVITIES {
            let activity = task_activities::get_or_create_activity(&mut *conn, name, false).await?;
            ids.extend(activity.id);
        }
        Ok(ids)
    }

    /// New projects with their people and activities
    async fn create_projects(
        &mut self,
        conn: &mut PgConnection,
        set: &DataSet,
        activities: &[Id],
    ) -> anyhow::Result<Vec<(Project, Vec<Id>)>> {
        let all = projects::all_projects(&mut *conn).await?;
        let mut names: HashSet<String> = projects::existing_names(&mut *conn).await?.into_iter().collect();
        let employees = users::ids_by_type(&mut *conn, UserType::Employee).await?;
        let managers = users::ids_by_type(&mut *conn, UserType::Manager).await?;
        let default_activity =
            task_activities::get_or_create_activity(&mut *conn, DEFAULT_TASK_ACTIVITY, true).await?;

        let mut created = Vec::new();
        for (status, target) in status_counts(set) {
            let existing = all.iter().filter(|p| p.status() == status).count() as i64;
            for _ in 0..projects_to_create(target, existing) {
                let name = self.unique_project_name(&mut names);
                let (start, stop, suspended) = project_dates(&mut self.rng, status, self.today);

                let mut project = Project::new(name, start);
                project.stop_date = stop;
                project.suspended = suspended;
                project.managers = pick_some(&mut self.rng, &managers, MAX_MANAGERS_PER_PROJECT);
                project.members = pick_some(&mut self.rng, &employees, MAX_MEMBERS_PER_PROJECT);
                project.members.extend(project.managers.iter().copied());

                let project = projects::insert_project(&mut *conn, &project).await?;
                let project_id = project
                    .id
                    .context("Inserted project has no id")?;

                let mut offered = pick_some(&mut self.rng, activities, MAX_ACTIVITIES_PER_PROJECT);
                offered.extend(default_activity.id);
                for activity_id in &offered {
                    task_activities::attach_activity(&mut *conn, project_id, *activity_id).await?;
                }

                self.summary.projects += 1;
                created.push((project, offered));
            }
        }
        Ok(created)
    }

    fn unique_project_name(&mut self, taken: &mut HashSet<String>) -> String {
        loop {
            let company: String = CompanyName().fake();
            let word: String = Buzzword().fake();
            let name = truncated(format!("{company} {word}"), PROJECT_NAME_MAX_LENGTH);
            if taken.insert(name.clone()) {
                return name;
            }
            let numbered = truncated(
                format!("{name} {}", self.rng.random_range(1..10_000)),
                PROJECT_NAME_MAX_LENGTH,
            );
            if taken.insert(numbered.clone()) {
                return numbered;
            }
        }
    }

    /// Reports on every working day of the current month for members of new projects
    async fn create_reports(
        &mut self,
        conn: &mut PgConnection,
        created: &[(Project, Vec<Id>)],
    ) -> anyhow::Result<()> {
        let mut memberships: BTreeMap<Id, Vec<&(Project, Vec<Id>)>> = BTreeMap::new();
        for entry in created {
            for member in &entry.0.members {
                memberships.entry(*member).or_default().push(entry);
            }
        }

        let days = MonthPeriod::containing(self.today).working_days();
        for (author_id, projects) in &memberships {
            for day in &days {
                let per_day = self.rng.random_range(1..=MAX_REPORTS_PER_DAY);
                for _ in 0..per_day {
                    let Some((project, offered)) = projects.choose(&mut self.rng).copied() else {
                        continue;
                    };
                    let (Some(project_id), Some(activity_id)) =
                        (project.id, offered.choose(&mut self.rng).copied())
                    else {
                        continue;
                    };

                    let report = Report {
                        id: None,
                        date: *day,
                        description: Sentence(3..10).fake(),
                        author_id: *author_id,
                        project_id,
                        task_activity_id: activity_id,
                        work_hours: random_work_hours(&mut self.rng, per_day),
                        editable: true,
                        creation_date: None,
                        last_update: None,
                    };
                    reports::insert_report(&mut *conn, &report).await?;
                    self.summary.reports += 1;
                }
            }
        }

        info!(
            authors = memberships.len(),
            working_days = days.len(),
            "Generated reports"
        );
        Ok(())
    }
}
