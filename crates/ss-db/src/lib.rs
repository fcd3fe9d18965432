//! # ss-db
//!
//! Database layer for SheetStorm.
//!
//! - Connection pool management and migrations
//! - Store traits services depend on
//! - Postgres repositories implementing them
//! - An in-memory store for tests and local runs
//!
//! ## Example
//!
//! ```ignore
//! use ss_db::{Database, UserRepository, UserStore};
//!
//! let db = Database::connect(&config.database).await?;
//! db.migrate().await?;
//!
//! let users = UserRepository::new(db.pool().clone());
//! let user = users.find_by_email("admin@codepoets.it").await?;
//! ```

pub mod memory;
pub mod pool;
pub mod projects;
pub mod reports;
pub mod repository;
pub mod task_activities;
pub mod users;

pub use memory::MemoryStore;
pub use pool::{Database, PoolStats};
pub use projects::{ProjectRepository, ProjectRow};
pub use reports::{ReportRepository, ReportRow};
pub use repository::{
    ProjectRemoval, ProjectStore, ReportFilter, ReportScope, ReportStore, RepositoryError,
    RepositoryResult, RoleChange, TaskActivityStore, UserStore,
};
pub use task_activities::{TaskActivityRepository, TaskActivityRow};
pub use users::{UserRepository, UserRow};
