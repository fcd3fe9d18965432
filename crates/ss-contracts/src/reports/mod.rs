//! Report contracts

mod base;
mod create;
mod delete;
mod update;

pub use base::{ReportBaseContract, ReportContext};
pub use create::CreateReportContract;
pub use delete::DeleteReportContract;
pub use update::UpdateReportContract;

use crate::base::UserContext;
use ss_models::{Project, Report};

/// Admins and the project's managers oversee every report in it
pub fn can_manage_report<U: UserContext>(user: &U, project: &Project) -> bool {
    user.is_admin() || (user.is_manager() && project.is_manager(user.id()))
}

pub fn can_view_report<U: UserContext>(user: &U, report: &Report, project: &Project) -> bool {
    report.author_id == user.id() || can_manage_report(user, project)
}

/// Authors lose write access once a manager locks the report
pub fn can_modify_report<U: UserContext>(user: &U, report: &Report, project: &Project) -> bool {
    can_manage_report(user, project) || (report.author_id == user.id() && report.editable)
}

#[cfg(test)]
mod tests {
    use super::base::tests::{project, report};
    use super::*;
    use crate::base::test_support::MockUser;
    use ss_core::types::WorkHours;

    #[test]
    fn test_view_rules() {
        let project = project();
        let report = report(1, WorkHours::from_hm(1, 0));

        assert!(can_view_report(&MockUser::employee(1), &report, &project));
        assert!(can_view_report(&MockUser::manager(2), &report, &project));
        assert!(can_view_report(&MockUser::admin(8), &report, &project));
        assert!(!can_view_report(&MockUser::manager(3), &report, &project));
        assert!(!can_view_report(&MockUser::employee(4), &report, &project));
    }
}
