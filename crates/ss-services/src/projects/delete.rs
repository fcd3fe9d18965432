use ss_contracts::base::UserContext;
use ss_contracts::projects::DeleteProjectContract;
use ss_core::result::SsResult;
use ss_core::traits::Id;

use super::membership::log_role_changes;
use super::ProjectService;
use crate::base::check;

impl ProjectService {
    /// Removes the project together with its reports
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub async fn delete<U: UserContext>(&self, actor: &U, id: Id) -> SsResult<()> {
        let project = self.find(id).await?;
        check(&DeleteProjectContract::new(actor), &project)?;

        let roles = self.role_changes(Some(id), &[], &project.managers).await?;
        self.stores.projects.delete(id, &roles).await?;
        log_role_changes(&roles);

        tracing::info!("Project {} deleted by {}", project.name, actor.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{project, stores, user};
    use crate::projects::ProjectService;
    use ss_core::error::SsError;
    use ss_models::UserType;

    #[tokio::test]
    async fn test_only_admin_deletes() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let manager_id = manager.id.unwrap();
        let p = project(&stores, "P", vec![manager_id], vec![manager_id]).await;
        let service = ProjectService::new(stores.clone());

        assert!(matches!(
            service.delete(&manager, p.id.unwrap()).await,
            Err(SsError::Forbidden { .. })
        ));

        service.delete(&admin, p.id.unwrap()).await.unwrap();
        assert!(stores.projects.find_by_id(p.id.unwrap()).await.unwrap().is_none());

        let demoted = stores.users.find_by_id(manager_id).await.unwrap().unwrap();
        assert_eq!(demoted.user_type, UserType::Employee);
    }
}
