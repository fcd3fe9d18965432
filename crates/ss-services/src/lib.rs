//! # ss-services
//!
//! Business operations for SheetStorm. Each service checks a contract from
//! `ss-contracts`, then works against the `ss-db` stores.

pub mod base;
pub mod projects;
pub mod reports;
pub mod task_activities;
pub mod users;

pub use base::{check, run_contract, validate_payload, AccountPolicy, Stores};
pub use projects::{demoted_role, promoted_role, ProjectService};
pub use reports::{ProjectWorkShare, ReportService};
pub use task_activities::TaskActivityService;
pub use users::UserService;
