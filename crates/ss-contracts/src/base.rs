//! Base contract system

use ss_core::error::ValidationErrors;
use ss_core::traits::Id;
use ss_models::{User, UserType};
use thiserror::Error;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// The acting user lacks the role or relation an operation needs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PermissionDenied(pub String);

pub type PermissionResult = Result<(), PermissionDenied>;

/// The user performing an operation
pub trait UserContext: Send + Sync {
    fn id(&self) -> Id;
    fn user_type(&self) -> UserType;

    fn is_admin(&self) -> bool {
        self.user_type() == UserType::Admin
    }

    fn is_manager(&self) -> bool {
        self.user_type() == UserType::Manager
    }

    /// Admins and managers may see project level screens
    fn is_admin_or_manager(&self) -> bool {
        matches!(self.user_type(), UserType::Admin | UserType::Manager)
    }
}

impl UserContext for User {
    fn id(&self) -> Id {
        self.id.unwrap_or_default()
    }

    fn user_type(&self) -> UserType {
        self.user_type
    }
}

/// Permission and validation rules for one operation on `T`
pub trait Contract<T>: Send + Sync {
    /// Whether the acting user may perform the operation at all
    fn authorize(&self, _entity: &T) -> PermissionResult {
        Ok(())
    }

    /// Whether the resulting entity is valid
    fn validate(&self, entity: &T) -> ValidationResult;

    fn is_writable(&self, _attribute: &str) -> bool {
        true
    }
}

/// Translate `validator` derive output into field keyed messages
pub fn from_validator(errors: validator::ValidationErrors) -> ValidationErrors {
    let mut result = ValidationErrors::new();
    collect_validator_errors(&errors, &mut result);
    result
}

fn collect_validator_errors(errors: &validator::ValidationErrors, result: &mut ValidationErrors) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let field_errors = match kind {
            ValidationErrorsKind::Field(field_errors) => field_errors,
            ValidationErrorsKind::Struct(nested) => {
                collect_validator_errors(nested, result);
                continue;
            }
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_validator_errors(nested, result);
                }
                continue;
            }
        };
        for error in field_errors {
            let message = match error.code.as_ref() {
                "length" => {
                    let length = error
                        .params
                        .get("value")
                        .and_then(|v| v.as_str())
                        .map(|s| s.chars().count() as u64);
                    let max = error.params.get("max").and_then(|v| v.as_u64());
                    match (length, max) {
                        (Some(length), Some(max)) if length > max => {
                            format!("Ensure this field has no more than {} characters.", max)
                        }
                        _ => "This field may not be blank.".to_string(),
                    }
                }
                code => error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", code)),
            };
            result.add(field.to_string(), message);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub struct MockUser {
        pub id: Id,
        pub user_type: UserType,
    }

    impl MockUser {
        pub fn employee(id: Id) -> Self {
            Self { id, user_type: UserType::Employee }
        }

        pub fn manager(id: Id) -> Self {
            Self { id, user_type: UserType::Manager }
        }

        pub fn admin(id: Id) -> Self {
            Self { id, user_type: UserType::Admin }
        }
    }

    impl UserContext for MockUser {
        fn id(&self) -> Id {
            self.id
        }

        fn user_type(&self) -> UserType {
            self.user_type
        }
    }
}
