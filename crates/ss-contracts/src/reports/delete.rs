use ss_models::{Project, Report};

use super::can_modify_report;
use crate::base::{Contract, PermissionDenied, PermissionResult, UserContext, ValidationResult};

pub struct DeleteReportContract<'a, U: UserContext> {
    user: &'a U,
    project: &'a Project,
}

impl<'a, U: UserContext> DeleteReportContract<'a, U> {
    pub fn new(user: &'a U, project: &'a Project) -> Self {
        Self { user, project }
    }
}

impl<'a, U: UserContext> Contract<Report> for DeleteReportContract<'a, U> {
    fn authorize(&self, entity: &Report) -> PermissionResult {
        if can_modify_report(self.user, entity, self.project) {
            Ok(())
        } else {
            Err(PermissionDenied("You can not delete this report".into()))
        }
    }

    fn validate(&self, _entity: &Report) -> ValidationResult {
        Ok(())
    }

    fn is_writable(&self, _attribute: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::super::base::tests::{project, report};
    use super::*;
    use crate::base::test_support::MockUser;
    use ss_core::types::WorkHours;

    #[test]
    fn test_delete_permissions() {
        let project = project();
        let mut report = report(1, WorkHours::from_hm(1, 0));

        assert!(DeleteReportContract::new(&MockUser::employee(1), &project).authorize(&report).is_ok());
        assert!(DeleteReportContract::new(&MockUser::employee(3), &project).authorize(&report).is_err());

        report.editable = false;
        assert!(DeleteReportContract::new(&MockUser::employee(1), &project).authorize(&report).is_err());
        assert!(DeleteReportContract::new(&MockUser::manager(2), &project).authorize(&report).is_ok());
        assert!(DeleteReportContract::new(&MockUser::admin(7), &project).authorize(&report).is_ok());
    }
}
