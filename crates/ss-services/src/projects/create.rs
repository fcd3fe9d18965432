use ss_contracts::base::UserContext;
use ss_contracts::projects::CreateProjectContract;
use ss_core::result::SsResult;
use ss_models::{CreateProjectDto, Project};

use super::membership::{add_unique, log_role_changes};
use super::ProjectService;
use crate::base::{check, validate_payload};

impl ProjectService {
    /// A creating manager becomes manager of the new project; listed
    /// managers are promoted and made members
    #[tracing::instrument(skip(self, actor, dto), fields(actor = actor.id()))]
    pub async fn create<U: UserContext>(&self, actor: &U, dto: CreateProjectDto) -> SsResult<Project> {
        validate_payload(&dto)?;
        let mut project = Project::from(dto);

        if actor.is_manager() {
            add_unique(&mut project.managers, actor.id());
        }
        for manager in project.managers.clone() {
            add_unique(&mut project.members, manager);
        }

        check(&CreateProjectContract::new(actor), &project)?;

        let roles = self.role_changes(None, &project.managers, &[]).await?;
        let project = self.stores.projects.insert(&project, &roles).await?;
        log_role_changes(&roles);

        tracing::info!("Project {} created by {}", project.name, actor.id());
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::test_support::{project, stores, user};
    use chrono::NaiveDate;
    use ss_core::error::SsError;
    use ss_models::UserType;

    fn dto(name: &str, managers: Vec<i64>) -> CreateProjectDto {
        CreateProjectDto {
            name: name.into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            stop_date: None,
            suspended: None,
            managers,
            members: vec![],
        }
    }

    #[tokio::test]
    async fn test_manager_becomes_manager_of_new_project() {
        let stores = stores();
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let manager_id = manager.id.unwrap();
        let service = ProjectService::new(stores);

        let created = service.create(&manager, dto("Time Monkey", vec![])).await.unwrap();
        assert!(created.is_manager(manager_id));
        assert!(created.is_member(manager_id));
        assert!(created.is_active());
    }

    #[tokio::test]
    async fn test_listed_employee_manager_is_promoted() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let employee = user(&stores, "e@codepoets.it", UserType::Employee).await;
        let employee_id = employee.id.unwrap();
        let service = ProjectService::new(stores.clone());

        let created = service.create(&admin, dto("P", vec![employee_id])).await.unwrap();
        assert!(!created.is_manager(admin.id.unwrap()));
        assert!(created.is_member(employee_id));

        let promoted = stores.users.find_by_id(employee_id).await.unwrap().unwrap();
        assert_eq!(promoted.user_type, UserType::Manager);
    }

    #[tokio::test]
    async fn test_create_rules() {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let employee = user(&stores, "e@codepoets.it", UserType::Employee).await;
        let existing = project(&stores, "Shared name", vec![], vec![]).await;
        let service = ProjectService::new(stores);

        assert!(matches!(
            service.create(&employee, dto("New", vec![])).await,
            Err(SsError::Forbidden { .. })
        ));
        let twin = service.create(&admin, dto("Shared name", vec![])).await.unwrap();
        assert_eq!(twin.name, existing.name);
        assert_ne!(twin.id, existing.id);
    }
}
