use ss_contracts::base::UserContext;
use ss_contracts::reports::{ReportContext, UpdateReportContract};
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_models::{Report, UpdateReportDto};

use super::ReportService;
use crate::base::{check, validate_payload};

impl ReportService {
    /// Authors edit while the report is editable; project managers and
    /// admins at any time, including the editable flag itself
    #[tracing::instrument(skip(self, actor, dto), fields(actor = actor.id()))]
    pub async fn update<U: UserContext>(
        &self,
        actor: &U,
        id: Id,
        dto: UpdateReportDto,
    ) -> SsResult<Report> {
        validate_payload(&dto)?;
        let original = self.find(id).await?;
        let original_project = self.project(original.project_id).await?;

        let mut report = original.clone();
        dto.apply_to(&mut report);

        let project = if report.project_id == original.project_id {
            original_project.clone()
        } else {
            self.project(report.project_id).await?
        };
        let task_activity = self.task_activity(Some(report.task_activity_id)).await?;
        let other_daily_hours = self
            .stores
            .reports
            .daily_hours(report.author_id, report.date, Some(id))
            .await?;

        let context = ReportContext {
            project: &project,
            task_activity: &task_activity,
            other_daily_hours,
        };
        let contract = UpdateReportContract::new(actor, &original, &original_project, &context)
            .with_changes(dto.changed_attributes());
        check(&contract, &report)?;

        Ok(self.stores.reports.update(&report).await?)
    }
}
