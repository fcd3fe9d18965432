//! User services
//!
//! Account creation, self registration, profile edits and the role side
//! effects of administrator edits.

mod create;
mod update;

use chrono::{Local, NaiveDate};
use ss_auth::verify_password;
use ss_contracts::base::UserContext;
use ss_contracts::users::UserBaseContract;
use ss_core::error::{SsError, ValidationErrors};
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_models::user::normalize_email;
use ss_models::User;

use crate::base::{AccountPolicy, Stores};

pub const DUPLICATE_EMAIL: &str = "A user is already registered with this e-mail address.";

#[derive(Clone)]
pub struct UserService {
    stores: Stores,
    policy: AccountPolicy,
}

impl UserService {
    pub fn new(stores: Stores, policy: AccountPolicy) -> Self {
        Self { stores, policy }
    }

    fn base_contract(&self, today: NaiveDate) -> UserBaseContract<'_> {
        UserBaseContract::new(&self.policy.valid_email_domains, today)
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    async fn ensure_email_free(&self, email: &str, exclude: Option<Id>) -> SsResult<()> {
        if self.stores.users.email_taken(email, exclude).await? {
            return Err(ValidationErrors::single("email", DUPLICATE_EMAIL).into());
        }
        Ok(())
    }

    pub async fn find(&self, id: Id) -> SsResult<User> {
        self.stores
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| SsError::not_found("User", id))
    }

    /// Admins see any account, everyone else only their own
    pub async fn get<U: UserContext>(&self, actor: &U, id: Id) -> SsResult<User> {
        if !actor.is_admin() && actor.id() != id {
            return Err(SsError::forbidden("You can only view your own account"));
        }
        self.find(id).await
    }

    /// Every account ordered by email, for administrators
    pub async fn list<U: UserContext>(&self, actor: &U) -> SsResult<Vec<User>> {
        if !actor.is_admin() {
            return Err(SsError::forbidden("Only administrators can list users"));
        }
        Ok(self.stores.users.list().await?)
    }

    /// Check credentials; inactive accounts cannot log in
    pub async fn authenticate(&self, email: &str, password: &str) -> SsResult<User> {
        let invalid = || SsError::Unauthorized {
            message: "Unable to log in with provided credentials.".into(),
        };

        let user = self
            .stores
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid)?;

        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !verify_password(password, hash) {
            tracing::debug!("Failed login for {}", user.email);
            return Err(invalid());
        }
        if !user.is_active {
            return Err(SsError::Unauthorized {
                message: "User account is disabled.".into(),
            });
        }

        Ok(user)
    }
}
