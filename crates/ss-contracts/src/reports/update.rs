use ss_models::{Project, Report};

use super::base::{ReportBaseContract, ReportContext};
use super::{can_manage_report, can_modify_report};
use crate::base::{Contract, PermissionDenied, PermissionResult, UserContext, ValidationResult};

pub struct UpdateReportContract<'a, U: UserContext> {
    user: &'a U,
    original: &'a Report,
    original_project: &'a Project,
    base: ReportBaseContract<'a>,
    changed: Vec<&'static str>,
}

impl<'a, U: UserContext> UpdateReportContract<'a, U> {
    pub fn new(
        user: &'a U,
        original: &'a Report,
        original_project: &'a Project,
        context: &'a ReportContext<'a>,
    ) -> Self {
        Self {
            user,
            original,
            original_project,
            base: ReportBaseContract::new(context),
            changed: Vec::new(),
        }
    }

    pub fn with_changes(mut self, changed: Vec<&'static str>) -> Self {
        self.changed = changed;
        self
    }
}

impl<'a, U: UserContext> Contract<Report> for UpdateReportContract<'a, U> {
    fn authorize(&self, _entity: &Report) -> PermissionResult {
        if !can_modify_report(self.user, self.original, self.original_project) {
            let message = if self.original.author_id == self.user.id() {
                "This report can no longer be edited"
            } else {
                "You can not edit this report"
            };
            return Err(PermissionDenied(message.into()));
        }

        if let Some(attribute) = self.changed.iter().find(|a| !self.is_writable(a)) {
            return Err(PermissionDenied(format!(
                "{} can only be changed by project managers",
                attribute
            )));
        }

        Ok(())
    }

    fn validate(&self, entity: &Report) -> ValidationResult {
        let mut errors = self.base.validate(entity).err().unwrap_or_default();
        if entity.project_id != self.original.project_id {
            self.base.validate_project_open(&mut errors);
        }
        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        match attribute {
            "editable" => can_manage_report(self.user, self.original_project),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::base::tests::{project, report};
    use super::*;
    use crate::base::test_support::MockUser;
    use ss_core::types::WorkHours;
    use ss_models::TaskActivityType;

    fn context<'a>(project: &'a Project, activity: &'a TaskActivityType) -> ReportContext<'a> {
        ReportContext {
            project,
            task_activity: activity,
            other_daily_hours: WorkHours::ZERO,
        }
    }

    #[test]
    fn test_author_edits_editable_report() {
        let project = project();
        let activity = TaskActivityType::default_activity();
        let ctx = context(&project, &activity);
        let original = report(1, WorkHours::from_hm(2, 0));
        let user = MockUser::employee(1);

        let contract = UpdateReportContract::new(&user, &original, &project, &ctx)
            .with_changes(vec!["work_hours"]);
        let updated = report(1, WorkHours::from_hm(3, 0));
        assert!(contract.authorize(&updated).is_ok());
        assert!(contract.validate(&updated).is_ok());
    }

    #[test]
    fn test_locked_report_only_for_managers() {
        let project = project();
        let activity = TaskActivityType::default_activity();
        let ctx = context(&project, &activity);
        let mut original = report(1, WorkHours::from_hm(2, 0));
        original.editable = false;

        let author = MockUser::employee(1);
        assert_eq!(
            UpdateReportContract::new(&author, &original, &project, &ctx).authorize(&original),
            Err(PermissionDenied("This report can no longer be edited".into()))
        );

        let manager = MockUser::manager(2);
        assert!(UpdateReportContract::new(&manager, &original, &project, &ctx)
            .authorize(&original)
            .is_ok());
    }

    #[test]
    fn test_author_cannot_unlock() {
        let project = project();
        let activity = TaskActivityType::default_activity();
        let ctx = context(&project, &activity);
        let original = report(1, WorkHours::from_hm(2, 0));
        let author = MockUser::employee(1);

        let contract = UpdateReportContract::new(&author, &original, &project, &ctx)
            .with_changes(vec!["editable"]);
        assert!(contract.authorize(&original).is_err());

        let admin = MockUser::admin(9);
        let contract = UpdateReportContract::new(&admin, &original, &project, &ctx)
            .with_changes(vec!["editable"]);
        assert!(contract.authorize(&original).is_ok());
    }

    #[test]
    fn test_other_employee_cannot_edit() {
        let project = project();
        let activity = TaskActivityType::default_activity();
        let ctx = context(&project, &activity);
        let original = report(1, WorkHours::from_hm(2, 0));
        let other = MockUser::employee(5);
        assert_eq!(
            UpdateReportContract::new(&other, &original, &project, &ctx).authorize(&original),
            Err(PermissionDenied("You can not edit this report".into()))
        );
    }
}
