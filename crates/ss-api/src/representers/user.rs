//! User HAL representer

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use ss_core::traits::Id;
use ss_models::{User, UserType};

use super::hal::{rels, HalCollection, HalLink, HalLinks, HalResource, API_PREFIX};

/// User representation for API responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    pub id: Id,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub user_type: UserType,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<DateTime<Utc>>,
}

pub struct UserRepresenter;

impl UserRepresenter {
    /// Admins get the edit link on every account
    pub fn represent(user: &User, can_manage: bool) -> HalResource<UserRepresentation> {
        let id = user.id.unwrap_or_default();
        let rep = UserRepresentation {
            id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            name: user.full_name(),
            date_of_birth: user.date_of_birth,
            phone_number: user.phone_number.clone(),
            country: user.country.clone(),
            user_type: user.user_type,
            is_active: user.is_active,
            date_joined: user.date_joined,
        };

        let base = format!("{}/users/{}", API_PREFIX, id);
        let mut links = HalLinks::new()
            .with(rels::SELF, HalLink::with_title(&base, user.full_name()))
            .with(
                rels::EXPORT,
                HalLink::templated(format!("{}/export/user/{}{{?year,month,format}}", API_PREFIX, id)),
            );
        if can_manage {
            links.add(rels::UPDATE, HalLink::new(&base).method("PATCH"));
        }

        HalResource::new("User", rep).with_links(links)
    }

    /// The account of the requesting user
    pub fn represent_me(user: &User) -> HalResource<UserRepresentation> {
        let me = format!("{}/users/me", API_PREFIX);
        let mut hal = Self::represent(user, false);
        hal.links.add(rels::UPDATE, HalLink::new(&me).method("PATCH"));
        hal.links.add(
            rels::REPORTS,
            HalLink::templated(format!("{}/reports{{?year,month}}", API_PREFIX)),
        );
        hal
    }

    pub fn represent_collection(
        users: Vec<User>,
        total: i64,
        offset: i64,
        page_size: i64,
    ) -> HalCollection<HalResource<UserRepresentation>> {
        let elements = users.iter().map(|u| Self::represent(u, true)).collect();
        HalCollection::new("UserCollection", elements, total, page_size, offset)
            .with_pagination_links(&format!("{}/users", API_PREFIX))
            .with_link("createUser", HalLink::new(format!("{}/users", API_PREFIX)).method("POST"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        let mut user = User::new("jan.kowalski@codepoets.it", UserType::Manager);
        user.id = Some(7);
        user.first_name = "Jan".into();
        user.last_name = "Kowalski".into();
        user.password_hash = Some("$argon2id$hash".into());
        user
    }

    #[test]
    fn test_user_representation() {
        let hal = UserRepresenter::represent(&create_test_user(), false);
        let json = serde_json::to_value(&hal).unwrap();

        assert_eq!(json["_type"], "User");
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Jan Kowalski");
        assert_eq!(json["userType"], "MANAGER");
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["_links"]["self"]["href"], "/api/v1/users/7");
        assert!(json["_links"].get("update").is_none());
    }

    #[test]
    fn test_me_links() {
        let hal = UserRepresenter::represent_me(&create_test_user());
        let json = serde_json::to_value(&hal).unwrap();
        assert_eq!(json["_links"]["update"]["href"], "/api/v1/users/me");
        assert_eq!(json["_links"]["update"]["method"], "PATCH");
        assert_eq!(json["_links"]["reports"]["templated"], true);
    }

    #[test]
    fn test_collection() {
        let collection = UserRepresenter::represent_collection(vec![create_test_user()], 1, 0, 20);
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["_type"], "UserCollection");
        assert_eq!(json["total"], 1);
        assert_eq!(json["_embedded"]["elements"][0]["_links"]["update"]["method"], "PATCH");
    }
}
