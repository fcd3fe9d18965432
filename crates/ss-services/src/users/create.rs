use ss_auth::hash_password;
use ss_contracts::base::UserContext;
use ss_contracts::users::{CreateUserContract, SignupContract};
use ss_core::error::SsError;
use ss_core::result::SsResult;
use ss_models::user::normalize_email;
use ss_models::{NewUser, SignupUser, User, UserType};

use super::UserService;
use crate::base::{check, validate_payload};

impl UserService {
    /// Account created by an administrator
    #[tracing::instrument(skip(self, actor, new_user), fields(actor = actor.id()))]
    pub async fn create<U: UserContext>(&self, actor: &U, new_user: NewUser) -> SsResult<User> {
        validate_payload(&new_user)?;
        let password = new_user.password.clone();
        let mut user = User::from(new_user);

        let contract = CreateUserContract::new(
            actor,
            self.base_contract(Self::today()),
            &password,
            self.policy.password_min_length,
        );
        check(&contract, &user)?;
        self.ensure_email_free(&user.email, None).await?;

        user.password_hash = Some(hash_password(&password).map_err(|e| SsError::Internal(e.to_string()))?);
        let user = self.stores.users.insert(&user).await?;

        tracing::info!("User {} created by {}", user.email, actor.id());
        Ok(user)
    }

    /// Self registration always yields an active employee
    #[tracing::instrument(skip(self, signup), fields(email = %signup.email))]
    pub async fn signup(&self, signup: SignupUser) -> SsResult<User> {
        let signup = SignupUser {
            email: normalize_email(&signup.email),
            ..signup
        };
        validate_payload(&signup)?;

        let contract = SignupContract::new(
            self.base_contract(Self::today()),
            self.policy.password_min_length,
        );
        check(&contract, &signup)?;
        self.ensure_email_free(&signup.email, None).await?;

        let mut user = User::new(&signup.email, UserType::Employee);
        user.is_active = true;
        user.password_hash =
            Some(hash_password(&signup.password).map_err(|e| SsError::Internal(e.to_string()))?);
        let user = self.stores.users.insert(&user).await?;

        tracing::info!("User {} signed up", user.email);
        Ok(user)
    }
}
