//! Field rules shared by project contracts

use ss_core::error::ValidationErrors;
use ss_models::project::NAME_MAX_LENGTH;
use ss_models::Project;

use crate::base::{Contract, ValidationResult};

pub struct ProjectBaseContract;

impl ProjectBaseContract {
    pub fn validate_name(&self, name: &str, errors: &mut ValidationErrors) {
        if name.trim().is_empty() {
            errors.add("name", "This field may not be blank.");
        } else if name.chars().count() as u64 > NAME_MAX_LENGTH {
            errors.add(
                "name",
                format!("Ensure this field has no more than {} characters.", NAME_MAX_LENGTH),
            );
        }
    }

    pub fn validate_dates(&self, project: &Project, errors: &mut ValidationErrors) {
        if let Some(stop_date) = project.stop_date {
            if stop_date < project.start_date {
                errors.add("stop_date", "A project can not be created after expired date!");
            }
        }
    }
}

impl Contract<Project> for ProjectBaseContract {
    fn validate(&self, entity: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_name(&entity.name, &mut errors);
        self.validate_dates(entity, &mut errors);

        errors.into_result()
    }
}
