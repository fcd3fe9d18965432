//! Test data generator
//!
//! Fills the database with random users, projects and reports. Counts are
//! targets: accounts and projects that already exist are kept and only the
//! difference is created.

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ss_core::config::AppConfig;
use ss_db::Database;

mod generator;
mod presets;
mod seed;

use generator::Generator;
use presets::{DataSet, DataSize};

#[derive(Parser, Debug)]
#[command(
    name = "generate-test-data",
    version,
    about = "Create sample data for SheetStorm testing"
)]
struct Args {
    /// Maximum number of admins to be in the database
    #[arg(short, long)]
    admin: Option<i64>,

    /// Maximum number of employees to be in the database
    #[arg(short, long)]
    employee: Option<i64>,

    /// Maximum number of managers to be in the database
    #[arg(short, long)]
    manager: Option<i64>,

    /// Create a superuser if none exists
    #[arg(short, long)]
    superuser: bool,

    /// Maximum number of suspended projects to be in the database
    #[arg(long)]
    suspended: Option<i64>,

    /// Maximum number of active projects to be in the database
    #[arg(long)]
    active: Option<i64>,

    /// Maximum number of completed projects to be in the database
    #[arg(long)]
    completed: Option<i64>,

    /// Use a predefined data set, ignoring the other counts
    #[arg(short = 'd', long, value_enum)]
    data_size: Option<DataSize>,

    /// Load the fixed demo accounts, projects and reports first
    #[arg(long)]
    seed_initial: bool,
}

impl Args {
    fn data_set(&self) -> DataSet {
        if let Some(size) = self.data_size {
            return size.data_set();
        }
        DataSet {
            superuser: self.superuser,
            admins: self.admin.unwrap_or(0),
            employees: self.employee.unwrap_or(0),
            managers: self.manager.unwrap_or(0),
            suspended_projects: self.suspended.unwrap_or(0),
            active_projects: self.active.unwrap_or(0),
            completed_projects: self.completed.unwrap_or(0),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ss_cli=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    let db = Database::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;

    if args.seed_initial {
        seed::load_initial_data(db.pool()).await?;
    }

    let set = args.data_set();
    if set.is_empty() {
        info!("Nothing to generate");
    } else {
        let summary = Generator::new(StdRng::from_os_rng())?
            .run(db.pool(), &set)
            .await?;
        info!(
            users = summary.users,
            projects = summary.projects,
            reports = summary.reports,
            "Test data generated"
        );
    }

    db.close().await;
    Ok(())
}
