//! Task activity services

use ss_contracts::base::UserContext;
use ss_contracts::projects::can_view_project;
use ss_contracts::task_activities::{ManageTaskActivityContract, ProjectActivityChange};
use ss_core::error::SsError;
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_models::{CreateTaskActivityDto, Project, TaskActivityType, DEFAULT_TASK_ACTIVITY};

use crate::base::{check, Stores};

#[derive(Clone)]
pub struct TaskActivityService {
    stores: Stores,
}

impl TaskActivityService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn project(&self, id: Id) -> SsResult<Project> {
        self.stores
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| SsError::not_found("Project", id))
    }

    pub async fn find(&self, id: Id) -> SsResult<TaskActivityType> {
        self.stores
            .task_activities
            .find_by_id(id)
            .await?
            .ok_or_else(|| SsError::not_found("TaskActivityType", id))
    }

    pub async fn get_or_create_default(&self) -> SsResult<TaskActivityType> {
        Ok(self
            .stores
            .task_activities
            .get_or_create(DEFAULT_TASK_ACTIVITY, true)
            .await?)
    }

    pub async fn list(&self) -> SsResult<Vec<TaskActivityType>> {
        Ok(self.stores.task_activities.list().await?)
    }

    /// The default activity plus the ones attached to the project
    pub async fn list_for_project<U: UserContext>(
        &self,
        actor: &U,
        project_id: Id,
    ) -> SsResult<Vec<TaskActivityType>> {
        let project = self.project(project_id).await?;
        if !can_view_project(actor, &project) {
            return Err(SsError::forbidden("You are not a member of this project"));
        }
        Ok(self.stores.task_activities.list_for_project(project_id).await?)
    }

    /// Attach an activity by name, creating it when unknown
    #[tracing::instrument(skip(self, actor, dto), fields(actor = actor.id()))]
    pub async fn add_to_project<U: UserContext>(
        &self,
        actor: &U,
        project_id: Id,
        dto: CreateTaskActivityDto,
    ) -> SsResult<TaskActivityType> {
        let project = self.project(project_id).await?;
        let name = dto.name.trim().to_string();
        let candidate = TaskActivityType::new(name.clone());
        check(
            &ManageTaskActivityContract::new(actor),
            &ProjectActivityChange {
                project: &project,
                activity: &candidate,
                remove: false,
            },
        )?;

        let mut activity = self.stores.task_activities.get_or_create(&name, false).await?;
        let activity_id = activity.id.ok_or_else(|| SsError::Internal("task activity without id".into()))?;
        self.stores.task_activities.attach(project_id, activity_id).await?;
        if !activity.projects.contains(&project_id) {
            activity.projects.push(project_id);
        }

        tracing::info!("Task activity {} added to {}", activity.name, project.name);
        Ok(activity)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub async fn remove_from_project<U: UserContext>(
        &self,
        actor: &U,
        project_id: Id,
        activity_id: Id,
    ) -> SsResult<()> {
        let project = self.project(project_id).await?;
        let activity = self
            .stores
            .task_activities
            .find_by_id(activity_id)
            .await?
            .ok_or_else(|| SsError::not_found("TaskActivityType", activity_id))?;
        check(
            &ManageTaskActivityContract::new(actor),
            &ProjectActivityChange {
                project: &project,
                activity: &activity,
                remove: true,
            },
        )?;

        self.stores.task_activities.detach(project_id, activity_id).await?;
        tracing::info!("Task activity {} removed from {}", activity.name, project.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{project, stores, user};
    use ss_models::UserType;

    fn named(name: &str) -> CreateTaskActivityDto {
        CreateTaskActivityDto { name: name.into() }
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        let stores = stores();
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let m = manager.id.unwrap();
        let p = project(&stores, "P", vec![m], vec![m]).await;
        let p_id = p.id.unwrap();
        let service = TaskActivityService::new(stores);

        let review = service.add_to_project(&manager, p_id, named("Review")).await.unwrap();
        assert!(review.available_in(p_id));

        let names: Vec<String> = service
            .list_for_project(&manager, p_id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert!(names.contains(&"Review".to_string()));
        assert!(names.contains(&DEFAULT_TASK_ACTIVITY.to_string()));

        service
            .remove_from_project(&manager, p_id, review.id.unwrap())
            .await
            .unwrap();
        let remaining = service.list_for_project(&manager, p_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_default_stays() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let p = project(&stores, "P", vec![], vec![]).await;
        let service = TaskActivityService::new(stores);

        let default = service.get_or_create_default().await.unwrap();
        assert!(default.is_default);
        assert_eq!(service.get_or_create_default().await.unwrap().id, default.id);

        assert!(matches!(
            service
                .remove_from_project(&admin, p.id.unwrap(), default.id.unwrap())
                .await,
            Err(SsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_only_project_managers_add() {
        let stores = stores();
        let employee = user(&stores, "e@codepoets.it", UserType::Employee).await;
        let p = project(&stores, "P", vec![], vec![employee.id.unwrap()]).await;
        let service = TaskActivityService::new(stores);

        assert!(matches!(
            service.add_to_project(&employee, p.id.unwrap(), named("Review")).await,
            Err(SsError::Forbidden { .. })
        ));
        assert!(matches!(
            service.add_to_project(&employee, p.id.unwrap(), named(" ")).await,
            Err(SsError::Forbidden { .. })
        ));
    }
}
