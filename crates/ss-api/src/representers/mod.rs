//! API Representers
//!
//! HAL+JSON representers turning domain models into response bodies.

pub mod hal;
pub mod project;
pub mod report;
pub mod task_activity;
pub mod user;

pub use hal::{HalCollection, HalError, HalLink, HalLinks, HalResource};
pub use project::ProjectRepresenter;
pub use report::{ReportNames, ReportRepresenter};
pub use task_activity::TaskActivityRepresenter;
pub use user::UserRepresenter;
