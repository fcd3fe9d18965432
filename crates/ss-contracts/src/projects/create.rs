use ss_models::Project;

use super::base::ProjectBaseContract;
use crate::base::{Contract, PermissionDenied, PermissionResult, UserContext, ValidationResult};

/// Admins and managers may open new projects
pub struct CreateProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> CreateProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for CreateProjectContract<'a, U> {
    fn authorize(&self, _entity: &Project) -> PermissionResult {
        if self.user.is_admin_or_manager() {
            Ok(())
        } else {
            Err(PermissionDenied(
                "Only managers and administrators can create projects".into(),
            ))
        }
    }

    fn validate(&self, entity: &Project) -> ValidationResult {
        ProjectBaseContract.validate(entity)
    }
}
