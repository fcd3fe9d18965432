//! Task activity HAL representer

use serde::Serialize;
use ss_core::traits::Id;
use ss_models::TaskActivityType;

use super::hal::{rels, HalCollection, HalLink, HalLinks, HalResource, API_PREFIX};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActivityRepresentation {
    pub id: Id,
    pub name: String,
    pub is_default: bool,
}

pub struct TaskActivityRepresenter;

impl TaskActivityRepresenter {
    /// Inside a project the activity can be detached by its managers
    pub fn represent(
        activity: &TaskActivityType,
        project: Option<(Id, bool)>,
    ) -> HalResource<TaskActivityRepresentation> {
        let id = activity.id.unwrap_or_default();
        let rep = TaskActivityRepresentation {
            id,
            name: activity.name.clone(),
            is_default: activity.is_default,
        };

        let mut links = HalLinks::new().with(
            rels::SELF,
            HalLink::with_title(format!("{}/task-activities/{}", API_PREFIX, id), activity.name.as_str()),
        );
        if let Some((project_id, can_manage)) = project {
            links.add(rels::PROJECT, HalLink::new(format!("{}/projects/{}", API_PREFIX, project_id)));
            if can_manage && !activity.is_default {
                links.add(
                    rels::DELETE,
                    HalLink::new(format!(
                        "{}/projects/{}/task-activities/{}",
                        API_PREFIX, project_id, id
                    ))
                    .method("DELETE"),
                );
            }
        }

        HalResource::new("TaskActivityType", rep).with_links(links)
    }

    pub fn represent_collection(
        activities: &[TaskActivityType],
        project: Option<(Id, bool)>,
        base_url: &str,
    ) -> HalCollection<HalResource<TaskActivityRepresentation>> {
        let total = activities.len() as i64;
        let elements = activities.iter().map(|a| Self::represent(a, project)).collect();
        HalCollection::new("TaskActivityTypeCollection", elements, total, total.max(1), 0)
            .with_link(rels::SELF, HalLink::new(base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_activity_is_not_removable() {
        let mut activity = TaskActivityType::default_activity();
        activity.id = Some(1);
        let hal = TaskActivityRepresenter::represent(&activity, Some((3, true)));
        let json = serde_json::to_value(&hal).unwrap();

        assert_eq!(json["name"], "Other");
        assert_eq!(json["isDefault"], true);
        assert!(json["_links"].get("delete").is_none());
    }

    #[test]
    fn test_project_activity_links() {
        let mut activity = TaskActivityType::new("Backend Development");
        activity.id = Some(4);
        let hal = TaskActivityRepresenter::represent(&activity, Some((3, true)));
        let json = serde_json::to_value(&hal).unwrap();

        assert_eq!(
            json["_links"]["delete"]["href"],
            "/api/v1/projects/3/task-activities/4"
        );
        assert_eq!(json["_links"]["project"]["href"], "/api/v1/projects/3");
    }
}
