//! Kinds of work a report can be booked as
//!
//! Tables: task_activity_types, project_task_activities

use serde::{Deserialize, Serialize};
use ss_core::traits::Id;
use validator::Validate;

pub const NAME_MAX_LENGTH: u64 = 30;

/// Activity used when a report names none
pub const DEFAULT_TASK_ACTIVITY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskActivityType {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 30))]
    pub name: String,

    pub is_default: bool,

    /// Projects the activity is offered in
    #[serde(default)]
    pub projects: Vec<Id>,
}

impl TaskActivityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            is_default: false,
            projects: vec![],
        }
    }

    pub fn default_activity() -> Self {
        Self {
            is_default: true,
            ..Self::new(DEFAULT_TASK_ACTIVITY)
        }
    }

    /// The default activity is usable in every project
    pub fn available_in(&self, project_id: Id) -> bool {
        self.is_default || self.projects.contains(&project_id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskActivityDto {
    #[validate(length(min = 1, max = 30))]
    pub name: String,
}
