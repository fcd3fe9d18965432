use ss_models::Report;

use super::base::{ReportBaseContract, ReportContext};
use crate::base::{Contract, PermissionDenied, PermissionResult, UserContext, ValidationResult};

/// Users book reports for themselves, in active projects they belong to
pub struct CreateReportContract<'a, U: UserContext> {
    user: &'a U,
    base: ReportBaseContract<'a>,
}

impl<'a, U: UserContext> CreateReportContract<'a, U> {
    pub fn new(user: &'a U, context: &'a ReportContext<'a>) -> Self {
        Self {
            user,
            base: ReportBaseContract::new(context),
        }
    }
}

impl<'a, U: UserContext> Contract<Report> for CreateReportContract<'a, U> {
    fn authorize(&self, entity: &Report) -> PermissionResult {
        if entity.author_id == self.user.id() {
            Ok(())
        } else {
            Err(PermissionDenied(
                "Reports can only be created for yourself".into(),
            ))
        }
    }

    fn validate(&self, entity: &Report) -> ValidationResult {
        let mut errors = self.base.validate(entity).err().unwrap_or_default();
        self.base.validate_project_open(&mut errors);
        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        attribute != "editable"
    }
}

#[cfg(test)]
mod tests {
    use super::super::base::tests::{project, report};
    use super::*;
    use crate::base::test_support::MockUser;
    use chrono::NaiveDate;
    use ss_core::types::WorkHours;
    use ss_models::TaskActivityType;

    #[test]
    fn test_create_own_report_in_active_project() {
        let project = project();
        let activity = TaskActivityType::default_activity();
        let context = ReportContext {
            project: &project,
            task_activity: &activity,
            other_daily_hours: WorkHours::ZERO,
        };
        let user = MockUser::employee(1);
        let contract = CreateReportContract::new(&user, &context);
        let report = report(1, WorkHours::from_hm(8, 0));
        assert!(contract.authorize(&report).is_ok());
        assert!(contract.validate(&report).is_ok());
    }

    #[test]
    fn test_cannot_create_for_someone_else() {
        let project = project();
        let activity = TaskActivityType::default_activity();
        let context = ReportContext {
            project: &project,
            task_activity: &activity,
            other_daily_hours: WorkHours::ZERO,
        };
        let user = MockUser::admin(2);
        let contract = CreateReportContract::new(&user, &context);
        assert!(contract.authorize(&report(1, WorkHours::from_hm(1, 0))).is_err());
    }

    #[test]
    fn test_completed_project_rejects_reports() {
        let mut project = project();
        project.stop_date = NaiveDate::from_ymd_opt(2024, 2, 1);
        let activity = TaskActivityType::default_activity();
        let context = ReportContext {
            project: &project,
            task_activity: &activity,
            other_daily_hours: WorkHours::ZERO,
        };
        let user = MockUser::employee(1);
        let errors = CreateReportContract::new(&user, &context)
            .validate(&report(1, WorkHours::from_hm(1, 0)))
            .unwrap_err();
        assert!(errors.has_error("project"));
    }
}
