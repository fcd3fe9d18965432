//! # ss-contracts
//!
//! Contracts decide whether the acting user may perform an operation
//! (`authorize`) and whether the resulting entity is valid (`validate`).
//! Services run both before touching the database.

pub mod base;
pub mod projects;
pub mod reports;
pub mod task_activities;
pub mod users;

pub use base::*;
