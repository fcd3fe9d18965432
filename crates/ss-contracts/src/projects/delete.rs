use ss_models::Project;

use crate::base::{Contract, PermissionDenied, PermissionResult, UserContext, ValidationResult};

/// Only administrators may delete projects; reports go with them
pub struct DeleteProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> DeleteProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for DeleteProjectContract<'a, U> {
    fn authorize(&self, _entity: &Project) -> PermissionResult {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(PermissionDenied(
                "Only administrators can delete projects".into(),
            ))
        }
    }

    fn validate(&self, _entity: &Project) -> ValidationResult {
        Ok(())
    }

    fn is_writable(&self, _attribute: &str) -> bool {
        false
    }
}
