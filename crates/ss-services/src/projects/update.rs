use ss_contracts::base::{Contract, UserContext};
use ss_contracts::projects::UpdateProjectContract;
use ss_core::error::SsError;
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_models::{Project, UpdateProjectDto};

use super::membership::{add_unique, log_role_changes};
use super::ProjectService;
use crate::base::validate_payload;

impl ProjectService {
    /// Scalar edits plus optional replacement of the manager and member
    /// lists. Managers always stay members.
    #[tracing::instrument(skip(self, actor, dto), fields(actor = actor.id()))]
    pub async fn update<U: UserContext>(
        &self,
        actor: &U,
        id: Id,
        dto: UpdateProjectDto,
    ) -> SsResult<Project> {
        validate_payload(&dto)?;
        let original = self.find(id).await?;

        let contract = UpdateProjectContract::new(actor);
        contract
            .authorize(&original)
            .map_err(|denied| SsError::forbidden(denied.0))?;

        let mut project = original.clone();
        dto.apply_to(&mut project);
        if let Some(ref members) = dto.members {
            project.members = members.clone();
        }
        if let Some(ref managers) = dto.managers {
            project.managers = managers.clone();
        }
        for manager in project.managers.clone() {
            add_unique(&mut project.members, manager);
        }

        contract.validate(&project)?;

        let added: Vec<Id> = project
            .managers
            .iter()
            .copied()
            .filter(|m| !original.is_manager(*m))
            .collect();
        let removed: Vec<Id> = original
            .managers
            .iter()
            .copied()
            .filter(|m| !project.is_manager(*m))
            .collect();
        let roles = self.role_changes(Some(id), &added, &removed).await?;

        let updated = self.stores.projects.update(&project, &roles).await?;
        log_role_changes(&roles);

        tracing::debug!("Project {} updated by {}", updated.name, actor.id());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{project, stores, user};
    use chrono::NaiveDate;
    use ss_models::{ProjectStatus, UserType};

    #[tokio::test]
    async fn test_complete_and_rename() {
        let stores = stores();
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let manager_id = manager.id.unwrap();
        let p = project(&stores, "Old", vec![manager_id], vec![manager_id]).await;
        let service = ProjectService::new(stores);

        let updated = service
            .update(
                &manager,
                p.id.unwrap(),
                UpdateProjectDto {
                    name: Some("New".into()),
                    stop_date: Some(NaiveDate::from_ymd_opt(2024, 6, 30)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "New");
        assert_eq!(updated.status(), ProjectStatus::Completed);
    }

    #[tokio::test]
    async fn test_stop_date_before_start_is_rejected() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let p = project(&stores, "P", vec![], vec![]).await;
        let service = ProjectService::new(stores);

        let result = service
            .update(
                &admin,
                p.id.unwrap(),
                UpdateProjectDto {
                    stop_date: Some(NaiveDate::from_ymd_opt(2023, 1, 1)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(SsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_replacing_managers_updates_roles() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let old = user(&stores, "old@codepoets.it", UserType::Manager).await;
        let new = user(&stores, "new@codepoets.it", UserType::Employee).await;
        let (old_id, new_id) = (old.id.unwrap(), new.id.unwrap());
        let p = project(&stores, "P", vec![old_id], vec![old_id]).await;
        let service = ProjectService::new(stores.clone());

        let updated = service
            .update(
                &admin,
                p.id.unwrap(),
                UpdateProjectDto {
                    managers: Some(vec![new_id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.managers, vec![new_id]);
        assert!(updated.is_member(new_id));
        assert!(updated.is_member(old_id));

        let old = stores.users.find_by_id(old_id).await.unwrap().unwrap();
        let new = stores.users.find_by_id(new_id).await.unwrap().unwrap();
        assert_eq!(old.user_type, UserType::Employee);
        assert_eq!(new.user_type, UserType::Manager);
    }

    #[tokio::test]
    async fn test_foreign_manager_cannot_update() {
        let stores = stores();
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let p = project(&stores, "P", vec![], vec![]).await;
        let service = ProjectService::new(stores);

        let result = service
            .update(&manager, p.id.unwrap(), UpdateProjectDto::default())
            .await;
        assert!(matches!(result, Err(SsError::Forbidden { .. })));
    }
}
