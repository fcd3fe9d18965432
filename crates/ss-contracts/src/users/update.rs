//! Editing accounts, either one's own profile or any account as administrator

use ss_core::traits::Id;
use ss_models::User;

use super::base::UserBaseContract;
use crate::base::{Contract, PermissionDenied, PermissionResult, UserContext, ValidationResult};

/// Attributes only an administrator may change
const ADMIN_ONLY_ATTRIBUTES: &[&str] = &["email", "user_type", "is_active"];

pub struct UpdateUserContract<'a, U: UserContext> {
    base: UserBaseContract<'a>,
    user: &'a U,
    target_user_id: Id,
    changed: Vec<&'static str>,
}

impl<'a, U: UserContext> UpdateUserContract<'a, U> {
    pub fn new(user: &'a U, target_user_id: Id, base: UserBaseContract<'a>) -> Self {
        Self {
            base,
            user,
            target_user_id,
            changed: vec![],
        }
    }

    pub fn mark_changed(&mut self, attribute: &'static str) {
        self.changed.push(attribute);
    }
}

impl<'a, U: UserContext> Contract<User> for UpdateUserContract<'a, U> {
    fn authorize(&self, _entity: &User) -> PermissionResult {
        if self.user.is_admin() {
            return Ok(());
        }
        if self.user.id() != self.target_user_id {
            return Err(PermissionDenied(
                "You can only edit your own account".into(),
            ));
        }
        if let Some(attribute) = self.changed.iter().find(|a| !self.is_writable(a)) {
            return Err(PermissionDenied(format!(
                "{} can only be changed by administrators",
                attribute
            )));
        }
        Ok(())
    }

    fn validate(&self, entity: &User) -> ValidationResult {
        self.base.validate(entity)
    }

    fn is_writable(&self, attribute: &str) -> bool {
        self.user.is_admin() || !ADMIN_ONLY_ATTRIBUTES.contains(&attribute)
    }
}
