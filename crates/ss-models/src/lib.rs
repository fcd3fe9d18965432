//! # ss-models
//!
//! Domain models for SheetStorm. Each entity implements the core traits
//! from `ss-core` (Entity, Identifiable, Timestamped).

pub use ss_core::traits::{Entity, Id, Identifiable, Timestamped};
pub use ss_core::types::WorkHours;

pub mod markdown;
pub mod project;
pub mod report;
pub mod task_activity;
pub mod user;

pub use project::{CreateProjectDto, Project, ProjectStatus, UpdateProjectDto};
pub use report::{CreateReportDto, Report, ReportEntry, UpdateReportDto};
pub use task_activity::{CreateTaskActivityDto, TaskActivityType, DEFAULT_TASK_ACTIVITY};
pub use user::{AdminUpdateUser, NewUser, SignupUser, UpdateProfile, User, UserType};
