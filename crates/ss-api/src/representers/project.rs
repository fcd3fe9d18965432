//! Project HAL representer

use chrono::NaiveDate;
use serde::Serialize;
use ss_contracts::base::UserContext;
use ss_core::traits::Id;
use ss_models::{Project, ProjectStatus};

use super::hal::{rels, HalCollection, HalLink, HalLinks, HalResource, API_PREFIX};

/// Project representation for API responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRepresentation {
    pub id: Id,
    pub name: String,
    pub start_date: NaiveDate,
    pub stop_date: Option<NaiveDate>,
    pub suspended: bool,
    pub status: ProjectStatus,
    pub managers: Vec<Id>,
    pub members: Vec<Id>,
}

pub struct ProjectRepresenter;

impl ProjectRepresenter {
    pub fn represent<U: UserContext>(project: &Project, viewer: &U) -> HalResource<ProjectRepresentation> {
        let rep = ProjectRepresentation {
            id: project.id.unwrap_or_default(),
            name: project.name.clone(),
            start_date: project.start_date,
            stop_date: project.stop_date,
            suspended: project.suspended,
            status: project.status(),
            managers: project.managers.clone(),
            members: project.members.clone(),
        };

        HalResource::new("Project", rep).with_links(Self::build_links(project, viewer))
    }

    pub fn represent_collection<U: UserContext>(
        projects: &[Project],
        viewer: &U,
        total: i64,
        offset: i64,
        page_size: i64,
    ) -> HalCollection<HalResource<ProjectRepresentation>> {
        let elements = projects.iter().map(|p| Self::represent(p, viewer)).collect();
        let collection = HalCollection::new("ProjectCollection", elements, total, page_size, offset)
            .with_pagination_links(&format!("{}/projects", API_PREFIX));
        if viewer.is_admin_or_manager() {
            collection.with_link(
                "createProject",
                HalLink::new(format!("{}/projects", API_PREFIX)).method("POST"),
            )
        } else {
            collection
        }
    }

    fn build_links<U: UserContext>(project: &Project, viewer: &U) -> HalLinks {
        let id = project.id.unwrap_or_default();
        let base = format!("{}/projects/{}", API_PREFIX, id);

        let mut links = HalLinks::new()
            .with(rels::SELF, HalLink::with_title(&base, project.name.as_str()))
            .with(rels::TASK_ACTIVITIES, HalLink::new(format!("{}/task-activities", base)))
            .with_array(
                rels::MANAGERS,
                project
                    .managers
                    .iter()
                    .map(|m| HalLink::new(format!("{}/users/{}", API_PREFIX, m)))
                    .collect(),
            );

        let manages = viewer.is_admin() || project.is_manager(viewer.id());
        if manages {
            links.add(rels::UPDATE, HalLink::new(&base).method("PATCH"));
            links.add(
                rels::REPORTS,
                HalLink::templated(format!("{}/reports/project/{}{{?year,month}}", API_PREFIX, id)),
            );
            links.add(
                rels::EXPORT,
                HalLink::templated(format!("{}/export/project/{}{{?year,month,format}}", API_PREFIX, id)),
            );
            links.add_array(
                rels::MEMBERS,
                project
                    .members
                    .iter()
                    .map(|m| HalLink::new(format!("{}/users/{}", API_PREFIX, m)))
                    .collect(),
            );
        }
        if viewer.is_admin() {
            links.add(rels::DELETE, HalLink::new(&base).method("DELETE"));
        }
        if project.is_active() && !project.is_member(viewer.id()) {
            links.add(rels::JOIN, HalLink::new(format!("{}/join", base)).method("POST"));
        }

        links
    }
}
