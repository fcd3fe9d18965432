//! Fixed demo accounts, projects and reports

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use ss_auth::hash_password;
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_db::{projects, reports, task_activities, users};
use ss_models::{Project, Report, User, UserType, DEFAULT_TASK_ACTIVITY};

use crate::generator::Summary;

pub const ADMIN_PASSWORD: &str = "superuser";
pub const USER_PASSWORD: &str = "passwduser";

pub struct DemoUser {
    pub email: &'static str,
    pub user_type: UserType,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub phone_number: Option<&'static str>,
    pub date_of_birth: Option<(i32, u32, u32)>,
    pub country: Option<&'static str>,
}

const fn demo(
    email: &'static str,
    user_type: UserType,
    first_name: &'static str,
    last_name: &'static str,
) -> DemoUser {
    DemoUser {
        email,
        user_type,
        first_name,
        last_name,
        phone_number: None,
        date_of_birth: None,
        country: None,
    }
}

pub const DEMO_USERS: [DemoUser; 5] = [
    DemoUser {
        phone_number: Some("123456789012345"),
        date_of_birth: Some((1962, 10, 10)),
        ..demo("user1@codepoets.it", UserType::Employee, "Mieczysław", "Mietkowiak")
    },
    demo("user2@codepoets.it", UserType::Employee, "Andromeda", "Adamiak"),
    demo("user3@codepoets.it", UserType::Manager, "Jan", "Nowakowski"),
    demo("user4@codepoets.it", UserType::Manager, "Anna", "Małomówna"),
    DemoUser {
        country: Some("DE"),
        ..demo("user5@codepoets.it", UserType::Employee, "Kurt", "Schmidt")
    },
];

pub const DEMO_ADMIN: &str = "admin@codepoets.it";

/// Demo project: name, days since start, days since stop, suspended,
/// manager indexes and member indexes into `DEMO_USERS`
pub struct DemoProject {
    pub name: &'static str,
    pub started_days_ago: i64,
    pub stopped_days_ago: Option<i64>,
    pub suspended: bool,
    pub managers: &'static [usize],
    pub members: &'static [usize],
}

pub const DEMO_PROJECTS: [DemoProject; 3] = [
    DemoProject {
        name: "Time monkey",
        started_days_ago: 28,
        stopped_days_ago: Some(14),
        suspended: false,
        managers: &[2],
        members: &[0, 1, 2, 3],
    },
    DemoProject {
        name: "Sheet storm",
        started_days_ago: 14,
        stopped_days_ago: None,
        suspended: false,
        managers: &[2],
        members: &[0, 1, 2],
    },
    DemoProject {
        name: "e_munchkin",
        started_days_ago: 7,
        stopped_days_ago: None,
        suspended: true,
        managers: &[2],
        members: &[1, 4, 2, 3],
    },
];

/// Demo report: author index, project index, days ago, hours, minutes, description
pub type DemoReport = (usize, usize, i64, i64, i64, &'static str);

pub const DEMO_REPORTS: [DemoReport; 12] = [
    (0, 1, 2, 8, 0, "Some report\r\ncontaining multiple lines\r\nin description."),
    (0, 1, 1, 4, 0, "Some report"),
    (0, 0, 1, 4, 0, "Some report on the same day as other."),
    (1, 1, 1, 6, 0, "Some report"),
    (1, 2, 2, 8, 30, "Some report containing hours with fraction"),
    (2, 1, 2, 7, 59, "Some report containing:\r\n- multiple lines in description\r\n- time with fraction"),
    (2, 1, 1, 2, 0, "Some report"),
    (3, 0, 1, 7, 1, "Some report containing time with fraction."),
    (3, 2, 2, 8, 0, "Some report"),
    (2, 0, 1, 2, 0, "Some report on the same day as other"),
    (2, 2, 1, 4, 0, "Some report on the same day as other two"),
    (4, 2, 1, 8, 0, "Some report"),
];

fn demo_user(demo: &DemoUser, password_hash: String) -> User {
    let mut user = User::new(demo.email, demo.user_type);
    user.first_name = demo.first_name.to_string();
    user.last_name = demo.last_name.to_string();
    user.phone_number = demo.phone_number.map(str::to_string);
    user.country = demo.country.map(str::to_string);
    user.date_of_birth = demo
        .date_of_birth
        .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
    user.password_hash = Some(password_hash);
    user
}

fn demo_project(demo: &DemoProject, people: &[Id], today: NaiveDate) -> Project {
    let pick = |indexes: &[usize]| -> Vec<Id> {
        indexes.iter().filter_map(|i| people.get(*i).copied()).collect()
    };
    let mut project = Project::new(demo.name, today - Duration::days(demo.started_days_ago));
    project.stop_date = demo.stopped_days_ago.map(|days| today - Duration::days(days));
    project.suspended = demo.suspended;
    project.managers = pick(demo.managers);
    project.members = pick(demo.members);
    project
}

async fn ensure_user(conn: &mut PgConnection, user: User) -> anyhow::Result<(Id, bool)> {
    if let Some(id) = users::id_by_email(&mut *conn, &user.email).await? {
        debug!(email = %user.email, "Demo user already exists");
        return Ok((id, false));
    }
    let user = users::insert_user(&mut *conn, &user).await?;
    Ok((user.id.context("Inserted user has no id")?, true))
}

/// Loads the demo data; existing accounts and projects are left alone
pub async fn load_initial_data(pool: &PgPool) -> anyhow::Result<Summary> {
    let mut tx = pool.begin().await?;
    let mut summary = Summary::default();
    let today = Utc::now().date_naive();

    let user_hash = hash_password(USER_PASSWORD).context("Failed to hash the demo password")?;
    let mut admin = User::new(DEMO_ADMIN, UserType::Admin);
    admin.is_superuser = true;
    admin.password_hash = Some(hash_password(ADMIN_PASSWORD).context("Failed to hash the admin password")?);
    if ensure_user(&mut tx, admin).await?.1 {
        summary.users += 1;
    }

    let mut people = Vec::with_capacity(DEMO_USERS.len());
    for demo in &DEMO_USERS {
        let (id, created) = ensure_user(&mut tx, demo_user(demo, user_hash.clone())).await?;
        summary.users += usize::from(created);
        people.push(id);
    }

    let default_activity =
        task_activities::get_or_create_activity(&mut *tx, DEFAULT_TASK_ACTIVITY, true).await?;
    let activity_id = default_activity.id.context("Default activity has no id")?;

    let existing = projects::existing_names(&mut *tx).await?;
    let mut project_ids: Vec<Option<Id>> = Vec::with_capacity(DEMO_PROJECTS.len());
    for demo in &DEMO_PROJECTS {
        if existing.iter().any(|name| name == demo.name) {
            project_ids.push(None);
            continue;
        }
        let project = projects::insert_project(&mut tx, &demo_project(demo, &people, today)).await?;
        let id = project.id.context("Inserted project has no id")?;
        task_activities::attach_activity(&mut *tx, id, activity_id).await?;
        summary.projects += 1;
        project_ids.push(Some(id));
    }

    // Reports are only added to projects created by this run
    for (author, project, days_ago, hours, minutes, description) in DEMO_REPORTS {
        let (Some(author_id), Some(Some(project_id))) =
            (people.get(author).copied(), project_ids.get(project).copied())
        else {
            continue;
        };
        let report = Report {
            id: None,
            date: today - Duration::days(days_ago),
            description: description.to_string(),
            author_id,
            project_id,
            task_activity_id: activity_id,
            work_hours: WorkHours::from_hm(hours, minutes),
            editable: true,
            creation_date: None,
            last_update: None,
        };
        reports::insert_report(&mut *tx, &report).await?;
        summary.reports += 1;
    }

    tx.commit().await?;
    info!(?summary, "Demo data loaded");
    Ok(summary)
}
