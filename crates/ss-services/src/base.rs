//! Shared plumbing for services
//!
//! Every service runs a contract before it touches storage: `authorize`
//! failures become forbidden results, `validate` failures field errors.

use std::sync::Arc;

use sqlx::PgPool;
use ss_contracts::base::{from_validator, Contract};
use ss_core::config::AppConfig;
use ss_core::result::{ServiceResult, SsResult};
use ss_db::{
    MemoryStore, ProjectRepository, ProjectStore, ReportRepository, ReportStore,
    TaskActivityRepository, TaskActivityStore, UserRepository, UserStore,
};
use validator::Validate;

/// The storage a service works against
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub reports: Arc<dyn ReportStore>,
    pub task_activities: Arc<dyn TaskActivityStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            projects: Arc::new(ProjectRepository::new(pool.clone())),
            reports: Arc::new(ReportRepository::new(pool.clone())),
            task_activities: Arc::new(TaskActivityRepository::new(pool)),
        }
    }

    /// All four stores backed by one shared in-memory store
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            projects: store.clone(),
            reports: store.clone(),
            task_activities: store,
        }
    }
}

/// Account rules taken from configuration
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    pub valid_email_domains: Vec<String>,
    pub password_min_length: usize,
}

impl AccountPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            valid_email_domains: config.accounts.valid_email_domains.clone(),
            password_min_length: config.auth.password_min_length,
        }
    }
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            valid_email_domains: vec!["codepoets.it".to_string()],
            password_min_length: 8,
        }
    }
}

/// Run a contract against an entity
pub fn run_contract<T, C: Contract<T>>(contract: &C, entity: &T) -> ServiceResult<()> {
    if let Err(denied) = contract.authorize(entity) {
        return ServiceResult::forbidden(denied.0);
    }
    match contract.validate(entity) {
        Ok(()) => ServiceResult::success(()),
        Err(errors) => ServiceResult::failure(errors),
    }
}

/// Shorthand for `run_contract(..).into_result()`
pub fn check<T, C: Contract<T>>(contract: &C, entity: &T) -> SsResult<()> {
    run_contract(contract, entity).into_result()
}

/// Field length rules declared on request payloads
pub fn validate_payload<T: Validate>(payload: &T) -> SsResult<()> {
    payload
        .validate()
        .map_err(|errors| from_validator(errors).into())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::NaiveDate;
    use ss_models::{Project, User, UserType};

    pub fn stores() -> Stores {
        Stores::memory()
    }

    pub async fn user(stores: &Stores, email: &str, user_type: UserType) -> User {
        let mut user = User::new(email, user_type);
        user.first_name = "Test".into();
        user.last_name = "User".into();
        stores.users.insert(&user).await.unwrap()
    }

    pub async fn project(stores: &Stores, name: &str, managers: Vec<i64>, members: Vec<i64>) -> Project {
        let mut project = Project::new(name, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        project.managers = managers;
        project.members = members;
        stores.projects.insert(&project, &[]).await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ss_contracts::base::{PermissionDenied, PermissionResult, ValidationResult};
    use ss_core::error::{SsError, ValidationErrors};

    struct Deny;
    impl Contract<()> for Deny {
        fn authorize(&self, _entity: &()) -> PermissionResult {
            Err(PermissionDenied("no".into()))
        }
        fn validate(&self, _entity: &()) -> ValidationResult {
            Ok(())
        }
    }

    struct Invalid;
    impl Contract<()> for Invalid {
        fn validate(&self, _entity: &()) -> ValidationResult {
            Err(ValidationErrors::single("name", "bad"))
        }
    }

    #[test]
    fn test_permission_failures_are_forbidden() {
        let result = run_contract(&Deny, &());
        assert!(result.forbidden);
        assert!(matches!(check(&Deny, &()), Err(SsError::Forbidden { .. })));
    }

    #[test]
    fn test_validation_failures_are_field_errors() {
        let result = run_contract(&Invalid, &());
        assert!(result.is_failure());
        assert!(!result.forbidden);
        assert!(matches!(check(&Invalid, &()), Err(SsError::Validation(_))));
    }
}
