//! User accounts
//!
//! Table: users

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ss_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

pub const EMAIL_MAX_LENGTH: u64 = 255;
pub const NAME_MAX_LENGTH: u64 = 30;
pub const COUNTRY_MAX_LENGTH: u64 = 64;

/// Role of an account. Managers are promoted and demoted automatically
/// as they gain or lose managed projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    #[default]
    Employee,
    Manager,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Manager => "MANAGER",
            Self::Admin => "ADMIN",
        }
    }

    pub fn all() -> [UserType; 3] {
        [Self::Employee, Self::Manager, Self::Admin]
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMPLOYEE" => Ok(Self::Employee),
            "MANAGER" => Ok(Self::Manager),
            "ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub email: String,

    #[validate(length(max = 30))]
    pub first_name: String,

    #[validate(length(max = 30))]
    pub last_name: String,

    pub date_of_birth: Option<NaiveDate>,

    pub phone_number: Option<String>,

    #[validate(length(max = 64))]
    pub country: Option<String>,

    pub user_type: UserType,

    pub is_active: bool,

    /// May use the administration back office
    pub is_staff: bool,

    pub is_superuser: bool,

    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,

    pub date_joined: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: None,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: None,
            phone_number: None,
            country: None,
            user_type: UserType::Employee,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            password_hash: None,
            date_joined: None,
            updated_at: None,
        }
    }
}

impl Identifiable for User {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for User {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.date_joined
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}

impl User {
    pub fn new(email: impl Into<String>, user_type: UserType) -> Self {
        Self {
            email: normalize_email(&email.into()),
            user_type,
            is_staff: user_type == UserType::Admin,
            ..Default::default()
        }
    }

    /// "First Last", trimmed when either part is blank
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Name used for export sheet titles: `First L.` or the e-mail
    pub fn export_display_name(&self) -> String {
        match self.last_name.chars().next() {
            Some(initial) if !self.first_name.is_empty() => {
                format!("{} {}.", self.first_name, initial)
            }
            _ => self.email.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    pub fn is_manager(&self) -> bool {
        self.user_type == UserType::Manager
    }

    pub fn is_employee(&self) -> bool {
        self.user_type == UserType::Employee
    }
}

/// E-mails are compared case insensitively, so they are stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account created by an administrator
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(length(min = 1, max = 255))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 30))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 30))]
    pub last_name: String,

    pub password: String,

    pub user_type: Option<UserType>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,

    #[validate(length(max = 64))]
    pub country: Option<String>,
}

impl From<NewUser> for User {
    fn from(new: NewUser) -> Self {
        let user_type = new.user_type.unwrap_or_default();
        Self {
            email: normalize_email(&new.email),
            first_name: new.first_name,
            last_name: new.last_name,
            date_of_birth: new.date_of_birth,
            phone_number: new.phone_number,
            country: new.country,
            user_type,
            is_staff: user_type == UserType::Admin,
            ..Default::default()
        }
    }
}

/// Self service registration
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupUser {
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Fields any user may change on their own profile
#[derive(Debug, Clone, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[validate(length(max = 30))]
    pub first_name: Option<String>,
    #[validate(length(max = 30))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    #[validate(length(max = 64))]
    pub country: Option<String>,
}

impl UpdateProfile {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(ref first_name) = self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(ref last_name) = self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(ref phone_number) = self.phone_number {
            user.phone_number = Some(phone_number.clone());
        }
        if let Some(ref country) = self.country {
            user.country = Some(country.clone());
        }
    }
}

/// Administrator edit of any account, including role and activity
#[derive(Debug, Clone, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUser {
    #[serde(flatten)]
    #[validate]
    pub profile: UpdateProfile,
    #[validate(length(min = 1, max = 255))]
    pub email: Option<String>,
    pub user_type: Option<UserType>,
    pub is_active: Option<bool>,
}

impl AdminUpdateUser {
    pub fn apply_to(&self, user: &mut User) {
        self.profile.apply_to(user);
        if let Some(ref email) = self.email {
            user.email = normalize_email(email);
        }
        if let Some(user_type) = self.user_type {
            user.user_type = user_type;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults_to_active_employee() {
        let user = User::new(" John.Doe@CodePoets.it ", UserType::Employee);
        assert_eq!(user.email, "john.doe@codepoets.it");
        assert!(user.is_active);
        assert!(user.is_employee());
        assert!(!user.is_staff);
    }

    #[test]
    fn test_admin_is_staff() {
        assert!(User::new("a@codepoets.it", UserType::Admin).is_staff);
    }

    #[test]
    fn test_names() {
        let mut user = User::new("jan@codepoets.it", UserType::Employee);
        assert_eq!(user.full_name(), "");
        assert_eq!(user.export_display_name(), "jan@codepoets.it");

        user.first_name = "Jan".into();
        assert_eq!(user.full_name(), "Jan");
        assert_eq!(user.export_display_name(), "jan@codepoets.it");

        user.last_name = "Nowak".into();
        assert_eq!(user.full_name(), "Jan Nowak");
        assert_eq!(user.export_display_name(), "Jan N.");
    }

    #[test]
    fn test_user_type_parsing_and_serde() {
        assert_eq!("manager".parse::<UserType>(), Ok(UserType::Manager));
        assert!("boss".parse::<UserType>().is_err());
        assert_eq!(
            serde_json::to_string(&UserType::Admin).unwrap(),
            "\"ADMIN\""
        );
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let mut user = User::new("a@codepoets.it", UserType::Employee);
        user.password_hash = Some("secret".into());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["userType"], "EMPLOYEE");
    }

    #[test]
    fn test_admin_update_applies_role_and_profile() {
        let mut user = User::new("a@codepoets.it", UserType::Employee);
        let update = AdminUpdateUser {
            profile: UpdateProfile {
                first_name: Some("Anna".into()),
                ..Default::default()
            },
            user_type: Some(UserType::Manager),
            is_active: Some(false),
            ..Default::default()
        };
        update.apply_to(&mut user);
        assert_eq!(user.first_name, "Anna");
        assert_eq!(user.user_type, UserType::Manager);
        assert!(!user.is_active);
    }

    #[test]
    fn test_length_validation() {
        let mut user = User::new("a@codepoets.it", UserType::Employee);
        user.first_name = "x".repeat(31);
        assert!(user.validate().is_err());
    }
}
