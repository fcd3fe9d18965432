//! API request handlers

pub mod auth;
pub mod export;
pub mod projects;
pub mod reports;
pub mod task_activities;
pub mod users;
