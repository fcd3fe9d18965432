//! Field rules shared by report contracts

use ss_core::error::ValidationErrors;
use ss_core::types::WorkHours;
use ss_models::report::DESCRIPTION_MAX_LENGTH;
use ss_models::{Project, Report, TaskActivityType};

use crate::base::{Contract, ValidationResult};

/// Records a report is checked against
pub struct ReportContext<'a> {
    pub project: &'a Project,
    pub task_activity: &'a TaskActivityType,
    /// Work the author already booked on the report's date, without this report
    pub other_daily_hours: WorkHours,
}

pub struct ReportBaseContract<'a> {
    context: &'a ReportContext<'a>,
}

impl<'a> ReportBaseContract<'a> {
    pub fn new(context: &'a ReportContext<'a>) -> Self {
        Self { context }
    }

    pub fn validate_description(&self, description: &str, errors: &mut ValidationErrors) {
        if description.trim().is_empty() {
            errors.add("description", "This field may not be blank.");
        } else if description.chars().count() as u64 > DESCRIPTION_MAX_LENGTH {
            errors.add(
                "description",
                format!(
                    "Ensure this field has no more than {} characters.",
                    DESCRIPTION_MAX_LENGTH
                ),
            );
        }
    }

    pub fn validate_work_hours(&self, work_hours: WorkHours, errors: &mut ValidationErrors) {
        if !work_hours.is_valid_for_report() {
            errors.add(
                "work_hours",
                format!(
                    "Ensure work hours are between {} and {}.",
                    WorkHours::MIN_REPORT,
                    WorkHours::MAX_REPORT
                ),
            );
            return;
        }
        if work_hours.exceeds_daily_limit(self.context.other_daily_hours) {
            errors.add(
                "work_hours",
                WorkHours::daily_limit_message(self.context.other_daily_hours),
            );
        }
    }

    pub fn validate_membership(&self, report: &Report, errors: &mut ValidationErrors) {
        if !self.context.project.is_member(report.author_id) {
            errors.add("project", "The author is not a member of this project");
        }
    }

    pub fn validate_task_activity(&self, errors: &mut ValidationErrors) {
        let project_id = self.context.project.id.unwrap_or_default();
        if !self.context.task_activity.available_in(project_id) {
            errors.add(
                "task_activity",
                "This task activity is not available in this project",
            );
        }
    }

    pub fn validate_project_open(&self, errors: &mut ValidationErrors) {
        if !self.context.project.is_active() {
            errors.add("project", "Reports can only be added to active projects");
        }
    }
}

impl<'a> Contract<Report> for ReportBaseContract<'a> {
    fn validate(&self, entity: &Report) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_description(&entity.description, &mut errors);
        self.validate_work_hours(entity.work_hours, &mut errors);
        self.validate_membership(entity, &mut errors);
        self.validate_task_activity(&mut errors);

        errors.into_result()
    }
}
