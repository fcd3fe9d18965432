//! Creating accounts by an administrator

use ss_models::User;

use super::base::{validate_password, UserBaseContract};
use crate::base::{Contract, PermissionDenied, PermissionResult, UserContext, ValidationResult};

pub struct CreateUserContract<'a, U: UserContext> {
    base: UserBaseContract<'a>,
    user: &'a U,
    password: &'a str,
    password_min_length: usize,
}

impl<'a, U: UserContext> CreateUserContract<'a, U> {
    pub fn new(
        user: &'a U,
        base: UserBaseContract<'a>,
        password: &'a str,
        password_min_length: usize,
    ) -> Self {
        Self {
            base,
            user,
            password,
            password_min_length,
        }
    }
}

impl<'a, U: UserContext> Contract<User> for CreateUserContract<'a, U> {
    fn authorize(&self, _entity: &User) -> PermissionResult {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(PermissionDenied(
                "Only administrators can create users".into(),
            ))
        }
    }

    fn validate(&self, entity: &User) -> ValidationResult {
        let mut errors = match self.base.validate(entity) {
            Ok(()) => ss_core::error::ValidationErrors::new(),
            Err(errors) => errors,
        };
        validate_password(self.password, None, self.password_min_length, &mut errors);
        errors.into_result()
    }
}
