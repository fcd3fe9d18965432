//! Report HAL representer

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_models::{Report, ReportEntry};

use super::hal::{rels, HalCollection, HalLink, HalLinks, HalResource, API_PREFIX};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRepresentation {
    pub id: Id,
    pub date: NaiveDate,
    pub description: String,
    pub description_html: String,
    pub work_hours: WorkHours,
    pub editable: bool,
    pub author_id: Id,
    pub project_id: Id,
    pub task_activity_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

/// Names resolved for the link titles
#[derive(Debug, Clone, Default)]
pub struct ReportNames {
    pub project: Option<String>,
    pub task_activity: Option<String>,
    pub author: Option<String>,
}

pub struct ReportRepresenter;

impl ReportRepresenter {
    pub fn represent(report: &Report, names: &ReportNames) -> HalResource<ReportRepresentation> {
        let id = report.id.unwrap_or_default();
        let rep = ReportRepresentation {
            id,
            date: report.date,
            description: report.description.clone(),
            description_html: report.markdown_description(),
            work_hours: report.work_hours,
            editable: report.editable,
            author_id: report.author_id,
            project_id: report.project_id,
            task_activity_id: report.task_activity_id,
            creation_date: report.creation_date,
            last_update: report.last_update,
        };

        let base = format!("{}/reports/{}", API_PREFIX, id);
        let titled = |href: String, title: &Option<String>| match title {
            Some(title) => HalLink::with_title(href, title.as_str()),
            None => HalLink::new(href),
        };
        let links = HalLinks::new()
            .with(rels::SELF, HalLink::new(&base))
            .with(rels::UPDATE, HalLink::new(&base).method("PATCH"))
            .with(rels::DELETE, HalLink::new(&base).method("DELETE"))
            .with(
                rels::PROJECT,
                titled(format!("{}/projects/{}", API_PREFIX, report.project_id), &names.project),
            )
            .with(
                rels::AUTHOR,
                titled(format!("{}/users/{}", API_PREFIX, report.author_id), &names.author),
            )
            .with(
                rels::TASK_ACTIVITY,
                titled(
                    format!("{}/task-activities/{}", API_PREFIX, report.task_activity_id),
                    &names.task_activity,
                ),
            );

        HalResource::new("Report", rep).with_links(links)
    }

    pub fn represent_entry(entry: &ReportEntry) -> HalResource<ReportRepresentation> {
        let names = ReportNames {
            project: Some(entry.project_name.clone()),
            task_activity: Some(entry.task_activity_name.clone()),
            author: Some(entry.author_email.clone()),
        };
        Self::represent(&entry.report, &names)
    }

    /// `base_url` carries the listing's query, pagination is appended to it
    pub fn represent_collection(
        entries: &[ReportEntry],
        total: i64,
        offset: i64,
        page_size: i64,
        base_url: &str,
    ) -> HalCollection<HalResource<ReportRepresentation>> {
        let elements = entries.iter().map(Self::represent_entry).collect();
        HalCollection::new("ReportCollection", elements, total, page_size, offset)
            .with_pagination_links(base_url)
    }
}
