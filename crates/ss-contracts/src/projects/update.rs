use ss_models::Project;

use super::base::ProjectBaseContract;
use crate::base::{Contract, PermissionDenied, PermissionResult, UserContext, ValidationResult};

/// Admins, or managers of this very project, may edit it
pub struct UpdateProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> UpdateProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

/// Shared by every operation that changes a project or its people
pub fn authorize_project_management<U: UserContext>(
    user: &U,
    project: &Project,
) -> PermissionResult {
    if user.is_admin() || (user.is_manager() && project.is_manager(user.id())) {
        Ok(())
    } else {
        Err(PermissionDenied(
            "You are not a manager of this project".into(),
        ))
    }
}

impl<'a, U: UserContext> Contract<Project> for UpdateProjectContract<'a, U> {
    fn authorize(&self, entity: &Project) -> PermissionResult {
        authorize_project_management(self.user, entity)
    }

    fn validate(&self, entity: &Project) -> ValidationResult {
        ProjectBaseContract.validate(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::MockUser;
    use chrono::NaiveDate;

    #[test]
    fn test_only_own_managers_may_update() {
        let mut project = Project::new("P", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        project.managers = vec![2];

        assert!(UpdateProjectContract::new(&MockUser::admin(1)).authorize(&project).is_ok());
        assert!(UpdateProjectContract::new(&MockUser::manager(2)).authorize(&project).is_ok());
        assert!(UpdateProjectContract::new(&MockUser::manager(3)).authorize(&project).is_err());
        assert!(UpdateProjectContract::new(&MockUser::employee(2)).authorize(&project).is_err());
    }
}
