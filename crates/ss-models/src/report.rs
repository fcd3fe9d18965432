//! Work hour reports
//!
//! Table: reports

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ss_core::traits::{Entity, Id, Identifiable, Timestamped};
use ss_core::types::WorkHours;
use validator::Validate;

pub const DESCRIPTION_MAX_LENGTH: u64 = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Option<Id>,
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 4096))]
    pub description: String,

    pub author_id: Id,
    pub project_id: Id,
    pub task_activity_id: Id,
    pub work_hours: WorkHours,

    /// Cleared once a manager has accepted the report
    pub editable: bool,

    pub creation_date: Option<DateTime<Utc>>,
    pub last_update: Option<DateTime<Utc>>,
}

impl Report {
    /// The description rendered from markdown to HTML
    pub fn markdown_description(&self) -> String {
        crate::markdown::to_html(&self.description)
    }

    /// The description without markdown markup
    pub fn plain_description(&self) -> String {
        crate::markdown::to_plain_text(&self.description)
    }
}

impl Identifiable for Report {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Report {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation_date
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }
}

impl Entity for Report {
    const TABLE_NAME: &'static str = "reports";
    const TYPE_NAME: &'static str = "Report";
}

/// A report joined with the names listings and exports display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    #[serde(flatten)]
    pub report: Report,
    pub project_name: String,
    pub task_activity_name: String,
    pub author_email: String,
}

/// Orders entries by date, then project name
pub fn sort_entries(entries: &mut [ReportEntry]) {
    entries.sort_by(|a, b| {
        a.report
            .date
            .cmp(&b.report.date)
            .then_with(|| a.project_name.cmp(&b.project_name))
            .then_with(|| a.report.id.cmp(&b.report.id))
    });
}

/// Summed work per date
pub fn work_hours_per_date<'a, I>(reports: I) -> BTreeMap<NaiveDate, WorkHours>
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut totals = BTreeMap::new();
    for report in reports {
        *totals.entry(report.date).or_insert(WorkHours::ZERO) += report.work_hours;
    }
    totals
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 4096))]
    pub description: String,
    pub project_id: Id,
    /// Falls back to the default activity
    pub task_activity_id: Option<Id>,
    pub work_hours: WorkHours,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportDto {
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 4096))]
    pub description: Option<String>,
    pub project_id: Option<Id>,
    pub task_activity_id: Option<Id>,
    pub work_hours: Option<WorkHours>,
    /// Only managers and admins may lock or unlock a report
    pub editable: Option<bool>,
}

impl UpdateReportDto {
    pub fn apply_to(&self, report: &mut Report) {
        if let Some(date) = self.date {
            report.date = date;
        }
        if let Some(ref description) = self.description {
            report.description = description.clone();
        }
        if let Some(project_id) = self.project_id {
            report.project_id = project_id;
        }
        if let Some(task_activity_id) = self.task_activity_id {
            report.task_activity_id = task_activity_id;
        }
        if let Some(work_hours) = self.work_hours {
            report.work_hours = work_hours;
        }
        if let Some(editable) = self.editable {
            report.editable = editable;
        }
    }

    /// Attributes the request tries to change
    pub fn changed_attributes(&self) -> Vec<&'static str> {
        let mut changed = vec![];
        if self.date.is_some() {
            changed.push("date");
        }
        if self.description.is_some() {
            changed.push("description");
        }
        if self.project_id.is_some() {
            changed.push("project");
        }
        if self.task_activity_id.is_some() {
            changed.push("task_activity");
        }
        if self.work_hours.is_some() {
            changed.push("work_hours");
        }
        if self.editable.is_some() {
            changed.push("editable");
        }
        changed
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn report(id: Id, date: NaiveDate, hours: i64) -> Report {
        Report {
            id: Some(id),
            date,
            description: "Some work".into(),
            author_id: 1,
            project_id: 1,
            task_activity_id: 1,
            work_hours: WorkHours::from_hm(hours, 0),
            editable: true,
            creation_date: None,
            last_update: None,
        }
    }

    fn entry(id: Id, date: NaiveDate, project: &str) -> ReportEntry {
        ReportEntry {
            report: report(id, date, 1),
            project_name: project.into(),
            task_activity_name: "Other".into(),
            author_email: "a@codepoets.it".into(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_sort_by_date_then_project() {
        let mut entries = vec![
            entry(1, date(2), "Beta"),
            entry(2, date(1), "Zeta"),
            entry(3, date(2), "Alpha"),
        ];
        sort_entries(&mut entries);
        let ids: Vec<_> = entries.iter().map(|e| e.report.id).collect();
        assert_eq!(ids, vec![Some(2), Some(3), Some(1)]);
    }

    #[test]
    fn test_work_hours_per_date() {
        let reports = vec![report(1, date(1), 3), report(2, date(1), 4), report(3, date(2), 8)];
        let totals = work_hours_per_date(&reports);
        assert_eq!(totals[&date(1)], WorkHours::from_hm(7, 0));
        assert_eq!(totals[&date(2)], WorkHours::from_hm(8, 0));
    }

    #[test]
    fn test_update_tracks_changes() {
        let update = UpdateReportDto {
            work_hours: Some(WorkHours::from_hm(2, 0)),
            editable: Some(false),
            ..Default::default()
        };
        assert_eq!(update.changed_attributes(), vec!["work_hours", "editable"]);

        let mut r = report(1, date(1), 8);
        update.apply_to(&mut r);
        assert_eq!(r.work_hours, WorkHours::from_hm(2, 0));
        assert!(!r.editable);
    }

    #[test]
    fn test_create_dto_accepts_decimal_hours() {
        let dto: CreateReportDto = serde_json::from_str(
            r#"{"date":"2024-03-01","description":"Coding","projectId":4,"workHours":7.5}"#,
        )
        .unwrap();
        assert_eq!(dto.work_hours, WorkHours::from_hm(7, 30));
        assert_eq!(dto.task_activity_id, None);
    }
}
