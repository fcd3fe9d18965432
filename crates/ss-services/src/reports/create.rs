use ss_contracts::base::UserContext;
use ss_contracts::reports::{CreateReportContract, ReportContext};
use ss_core::result::SsResult;
use ss_models::{CreateReportDto, Report};

use super::ReportService;
use crate::base::{check, validate_payload};

impl ReportService {
    /// Books work for the acting user; without an activity the default
    /// "Other" is used
    #[tracing::instrument(skip(self, actor, dto), fields(actor = actor.id()))]
    pub async fn create<U: UserContext>(&self, actor: &U, dto: CreateReportDto) -> SsResult<Report> {
        validate_payload(&dto)?;
        let project = self.project(dto.project_id).await?;
        let task_activity = self.task_activity(dto.task_activity_id).await?;
        let other_daily_hours = self
            .stores
            .reports
            .daily_hours(actor.id(), dto.date, None)
            .await?;

        let report = Report {
            id: None,
            date: dto.date,
            description: dto.description,
            author_id: actor.id(),
            project_id: dto.project_id,
            task_activity_id: task_activity.id.unwrap_or_default(),
            work_hours: dto.work_hours,
            editable: true,
            creation_date: None,
            last_update: None,
        };

        let context = ReportContext {
            project: &project,
            task_activity: &task_activity,
            other_daily_hours,
        };
        check(&CreateReportContract::new(actor, &context), &report)?;

        let report = self.stores.reports.insert(&report).await?;
        tracing::debug!(
            "Report {:?} created by {} in {}",
            report.id,
            actor.id(),
            project.name
        );
        Ok(report)
    }
}
