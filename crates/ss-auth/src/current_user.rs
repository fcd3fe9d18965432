//! The authenticated user behind a request

use ss_contracts::UserContext;
use ss_core::traits::Id;
use ss_models::{User, UserType};

/// Snapshot of the acting user, re-read from storage on every request so
/// role changes apply immediately
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Id,
    pub email: String,
    pub user_type: UserType,
}

impl CurrentUser {
    pub fn new(id: Id, email: impl Into<String>, user_type: UserType) -> Self {
        Self {
            id,
            email: email.into(),
            user_type,
        }
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self::new(user.id.unwrap_or_default(), user.email.clone(), user.user_type)
    }
}

impl UserContext for CurrentUser {
    fn id(&self) -> Id {
        self.id
    }

    fn user_type(&self) -> UserType {
        self.user_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_user() {
        let mut user = User::new("Manager@CodePoets.it", UserType::Manager);
        user.id = Some(7);
        let current = CurrentUser::from(&user);
        assert_eq!(current.id, 7);
        assert_eq!(current.email, "manager@codepoets.it");
        assert!(current.is_manager());
        assert!(current.is_admin_or_manager());
        assert!(!current.is_admin());
    }
}
