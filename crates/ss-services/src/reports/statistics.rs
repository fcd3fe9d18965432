//! Share of a user's work per project

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use ss_contracts::base::UserContext;
use ss_core::error::SsError;
use ss_core::period::MonthPeriod;
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_db::{ReportFilter, ReportScope};
use ss_models::ReportEntry;

use super::ReportService;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWorkShare {
    pub project_id: Id,
    pub project_name: String,
    pub work_hours: WorkHours,
    pub percentage: f64,
}

pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Shares ordered by project name
fn work_shares(entries: &[ReportEntry]) -> Vec<ProjectWorkShare> {
    let total: WorkHours = entries.iter().map(|e| e.report.work_hours).sum();
    if total == WorkHours::ZERO {
        return vec![];
    }

    let mut per_project: BTreeMap<(&str, Id), WorkHours> = BTreeMap::new();
    for entry in entries {
        *per_project
            .entry((entry.project_name.as_str(), entry.report.project_id))
            .or_insert(WorkHours::ZERO) += entry.report.work_hours;
    }

    per_project
        .into_iter()
        .map(|((name, project_id), work_hours)| ProjectWorkShare {
            project_id,
            project_name: name.to_string(),
            work_hours,
            percentage: round_percentage(
                work_hours.minutes() as f64 * 100.0 / total.minutes() as f64,
            ),
        })
        .collect()
}

impl ReportService {
    /// Per project share of the user's hours. The current month looks at the
    /// trailing 30 days, any other month at the whole month.
    pub async fn projects_work_percentage<U: UserContext>(
        &self,
        actor: &U,
        user_id: Id,
        year: i32,
        month: u32,
    ) -> SsResult<Vec<ProjectWorkShare>> {
        self.projects_work_percentage_on(actor, user_id, year, month, Local::now().date_naive())
            .await
    }

    pub(crate) async fn projects_work_percentage_on<U: UserContext>(
        &self,
        actor: &U,
        user_id: Id,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> SsResult<Vec<ProjectWorkShare>> {
        if !actor.is_admin() && actor.id() != user_id {
            return Err(SsError::forbidden(
                "Only administrators can view statistics of other users",
            ));
        }
        let (from, to) = MonthPeriod::new(year, month)?.statistics_window(today);
        let filter = ReportFilter::new(from, to, ReportScope::Author(user_id));
        let entries = self.stores.reports.list(&filter).await?;
        Ok(work_shares(&entries))
    }
}
