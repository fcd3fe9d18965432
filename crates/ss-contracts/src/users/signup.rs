//! Self registration

use ss_core::error::ValidationErrors;
use ss_models::SignupUser;

use super::base::{validate_password, UserBaseContract};
use crate::base::{Contract, ValidationResult};

pub struct SignupContract<'a> {
    base: UserBaseContract<'a>,
    password_min_length: usize,
}

impl<'a> SignupContract<'a> {
    pub fn new(base: UserBaseContract<'a>, password_min_length: usize) -> Self {
        Self {
            base,
            password_min_length,
        }
    }
}

impl<'a> Contract<SignupUser> for SignupContract<'a> {
    fn validate(&self, entity: &SignupUser) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        self.base.validate_email(&entity.email, &mut errors);
        validate_password(
            &entity.password,
            Some(&entity.password_confirmation),
            self.password_min_length,
            &mut errors,
        );
        errors.into_result()
    }
}
