//! Task activity contracts

use ss_core::error::ValidationErrors;
use ss_models::task_activity::NAME_MAX_LENGTH;
use ss_models::{Project, TaskActivityType};

use crate::base::{Contract, PermissionResult, UserContext, ValidationResult};
use crate::projects::authorize_project_management;

/// Attaching an activity to a project or detaching it
pub struct ProjectActivityChange<'p> {
    pub project: &'p Project,
    pub activity: &'p TaskActivityType,
    pub remove: bool,
}

pub struct ManageTaskActivityContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> ManageTaskActivityContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

pub fn validate_activity_name(name: &str, errors: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errors.add("name", "This field may not be blank.");
    } else if name.chars().count() as u64 > NAME_MAX_LENGTH {
        errors.add(
            "name",
            format!(
                "Ensure this field has no more than {} characters.",
                NAME_MAX_LENGTH
            ),
        );
    }
}

impl<'a, 'p, U: UserContext> Contract<ProjectActivityChange<'p>>
    for ManageTaskActivityContract<'a, U>
{
    fn authorize(&self, entity: &ProjectActivityChange<'p>) -> PermissionResult {
        authorize_project_management(self.user, entity.project)
    }

    fn validate(&self, entity: &ProjectActivityChange<'p>) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_activity_name(&entity.activity.name, &mut errors);
        if entity.remove && entity.activity.is_default {
            errors.add("task_activity", "The default task activity can not be removed");
        }
        errors.into_result()
    }
}
