//! Project services

mod create;
mod delete;
mod membership;
mod update;

pub use membership::{demoted_role, promoted_role};

use ss_contracts::base::UserContext;
use ss_contracts::projects::{can_list_projects, can_view_project};
use ss_core::error::SsError;
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_models::Project;

use crate::base::Stores;

#[derive(Clone)]
pub struct ProjectService {
    stores: Stores,
}

impl ProjectService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn find(&self, id: Id) -> SsResult<Project> {
        self.stores
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| SsError::not_found("Project", id))
    }

    pub async fn get<U: UserContext>(&self, actor: &U, id: Id) -> SsResult<Project> {
        let project = self.find(id).await?;
        if !can_view_project(actor, &project) {
            return Err(SsError::forbidden("You are not a member of this project"));
        }
        Ok(project)
    }

    /// Admins list every project, managers the ones they manage
    pub async fn list<U: UserContext>(&self, actor: &U) -> SsResult<Vec<Project>> {
        if !can_list_projects(actor) {
            return Err(SsError::forbidden(
                "Only managers and administrators can list projects",
            ));
        }
        if actor.is_admin() {
            Ok(self.stores.projects.list().await?)
        } else {
            Ok(self.stores.projects.list_managed_by(actor.id()).await?)
        }
    }

    /// Projects the acting user reports into
    pub async fn list_joined<U: UserContext>(&self, actor: &U) -> SsResult<Vec<Project>> {
        Ok(self.stores.projects.list_joined_by(actor.id()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{project, stores, user};
    use ss_models::UserType;

    #[tokio::test]
    async fn test_list_is_scoped() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let employee = user(&stores, "e@codepoets.it", UserType::Employee).await;
        let manager_id = manager.id.unwrap();
        project(&stores, "Beta", vec![manager_id], vec![manager_id]).await;
        project(&stores, "Alpha", vec![], vec![]).await;
        let service = ProjectService::new(stores);

        let names = |projects: Vec<Project>| projects.into_iter().map(|p| p.name).collect::<Vec<_>>();
        assert_eq!(names(service.list(&admin).await.unwrap()), vec!["Alpha", "Beta"]);
        assert_eq!(names(service.list(&manager).await.unwrap()), vec!["Beta"]);
        assert!(matches!(service.list(&employee).await, Err(SsError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_members_can_view() {
        let stores = stores();
        let employee = user(&stores, "e@codepoets.it", UserType::Employee).await;
        let outsider = user(&stores, "o@codepoets.it", UserType::Employee).await;
        let p = project(&stores, "P", vec![], vec![employee.id.unwrap()]).await;
        let service = ProjectService::new(stores);

        assert!(service.get(&employee, p.id.unwrap()).await.is_ok());
        assert!(service.get(&outsider, p.id.unwrap()).await.is_err());
        assert!(matches!(
            service.get(&employee, 999).await,
            Err(SsError::NotFound { .. })
        ));
    }
}
