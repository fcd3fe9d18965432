use ss_contracts::base::UserContext;
use ss_contracts::users::UpdateUserContract;
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_db::ProjectRemoval;
use ss_models::{AdminUpdateUser, UpdateProfile, User, UserType};

use super::UserService;
use crate::base::{check, validate_payload};

impl UserService {
    /// The acting user edits their own profile
    pub async fn update_profile<U: UserContext>(
        &self,
        actor: &U,
        changes: UpdateProfile,
    ) -> SsResult<User> {
        validate_payload(&changes)?;
        let mut user = self.find(actor.id()).await?;
        changes.apply_to(&mut user);

        let contract = UpdateUserContract::new(actor, actor.id(), self.base_contract(Self::today()));
        check(&contract, &user)?;

        Ok(self.stores.users.update(&user).await?)
    }

    /// Administrator edit of any account.
    ///
    /// Demoting to employee drops the user from the projects they manage.
    /// Deactivating also demotes and removes them from every project.
    #[tracing::instrument(skip(self, actor, changes), fields(actor = actor.id()))]
    pub async fn update_by_admin<U: UserContext>(
        &self,
        actor: &U,
        id: Id,
        changes: AdminUpdateUser,
    ) -> SsResult<User> {
        validate_payload(&changes)?;
        let original = self.find(id).await?;
        let mut user = original.clone();
        changes.apply_to(&mut user);

        let mut contract = UpdateUserContract::new(actor, id, self.base_contract(Self::today()));
        if user.email != original.email {
            contract.mark_changed("email");
        }
        if user.user_type != original.user_type {
            contract.mark_changed("user_type");
        }
        if user.is_active != original.is_active {
            contract.mark_changed("is_active");
        }
        check(&contract, &user)?;

        if user.email != original.email {
            self.ensure_email_free(&user.email, Some(id)).await?;
        }

        let deactivated = original.is_active && !user.is_active;
        if deactivated {
            user.user_type = UserType::Employee;
        }
        user.is_staff = user.user_type == UserType::Admin || user.is_superuser;

        let removal = if deactivated {
            Some(ProjectRemoval::AllProjects)
        } else if user.user_type == UserType::Employee && original.user_type != UserType::Employee {
            Some(ProjectRemoval::ManagerRoles)
        } else {
            None
        };

        let updated = match removal {
            Some(removal) => self.stores.users.update_and_remove(&user, removal).await?,
            None => self.stores.users.update(&user).await?,
        };
        match removal {
            Some(ProjectRemoval::AllProjects) => {
                tracing::info!("User {} deactivated and removed from all projects", updated.email)
            }
            Some(ProjectRemoval::ManagerRoles) => {
                tracing::info!("User {} demoted to employee", updated.email)
            }
            None => {}
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{project, stores, user};
    use crate::base::AccountPolicy;
    use ss_core::error::SsError;

    #[tokio::test]
    async fn test_update_own_profile() {
        let stores = stores();
        let employee = user(&stores, "e@codepoets.it", UserType::Employee).await;
        let service = UserService::new(stores, AccountPolicy::default());

        let updated = service
            .update_profile(
                &employee,
                UpdateProfile {
                    first_name: Some("Ewa".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Ewa");

        let invalid = service
            .update_profile(
                &employee,
                UpdateProfile {
                    last_name: Some("B@d".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(invalid, Err(SsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_demotion_drops_managed_projects() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let manager_id = manager.id.unwrap();
        let p = project(&stores, "P", vec![manager_id], vec![manager_id]).await;
        let service = UserService::new(stores.clone(), AccountPolicy::default());

        let updated = service
            .update_by_admin(
                &admin,
                manager_id,
                AdminUpdateUser {
                    user_type: Some(UserType::Employee),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.user_type, UserType::Employee);

        let p = stores.projects.find_by_id(p.id.unwrap()).await.unwrap().unwrap();
        assert!(!p.is_manager(manager_id));
        assert!(p.is_member(manager_id));
    }

    #[tokio::test]
    async fn test_deactivation_removes_from_all_projects() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let manager_id = manager.id.unwrap();
        let p = project(&stores, "P", vec![manager_id], vec![manager_id]).await;
        let service = UserService::new(stores.clone(), AccountPolicy::default());

        let updated = service
            .update_by_admin(
                &admin,
                manager_id,
                AdminUpdateUser {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.user_type, UserType::Employee);

        let p = stores.projects.find_by_id(p.id.unwrap()).await.unwrap().unwrap();
        assert!(p.managers.is_empty());
        assert!(p.members.is_empty());
    }

    #[tokio::test]
    async fn test_employee_cannot_change_own_role() {
        let stores = stores();
        let employee = user(&stores, "e@codepoets.it", UserType::Employee).await;
        let service = UserService::new(stores, AccountPolicy::default());

        let result = service
            .update_by_admin(
                &employee,
                employee.id.unwrap(),
                AdminUpdateUser {
                    user_type: Some(UserType::Admin),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(SsError::Forbidden { .. })));
    }
}
