//! Projects reports are recorded against
//!
//! Tables: projects, project_managers, project_members

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ss_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

pub const NAME_MAX_LENGTH: u64 = 64;

/// Lifecycle state, derived from the stop date and the suspended flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Suspended,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Completed => "completed",
        }
    }

    pub fn all() -> [ProjectStatus; 3] {
        [Self::Suspended, Self::Active, Self::Completed]
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unsupported project type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 64))]
    pub name: String,

    pub start_date: NaiveDate,

    /// Set once the project is finished
    pub stop_date: Option<NaiveDate>,

    pub suspended: bool,

    #[serde(default)]
    pub managers: Vec<Id>,

    #[serde(default)]
    pub members: Vec<Id>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for Project {
    const TABLE_NAME: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

impl Project {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            start_date,
            stop_date: None,
            suspended: false,
            managers: vec![],
            members: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    /// A stop date wins over the suspended flag
    pub fn status(&self) -> ProjectStatus {
        if self.stop_date.is_some() {
            ProjectStatus::Completed
        } else if self.suspended {
            ProjectStatus::Suspended
        } else {
            ProjectStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == ProjectStatus::Active
    }

    pub fn is_manager(&self, user_id: Id) -> bool {
        self.managers.contains(&user_id)
    }

    pub fn is_member(&self, user_id: Id) -> bool {
        self.members.contains(&user_id)
    }
}

/// Distinguishes an absent field from an explicit `null`
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub start_date: NaiveDate,
    pub stop_date: Option<NaiveDate>,
    pub suspended: Option<bool>,
    #[serde(default)]
    pub managers: Vec<Id>,
    #[serde(default)]
    pub members: Vec<Id>,
}

impl From<CreateProjectDto> for Project {
    fn from(dto: CreateProjectDto) -> Self {
        Self {
            stop_date: dto.stop_date,
            suspended: dto.suspended.unwrap_or(false),
            managers: dto.managers,
            members: dto.members,
            ..Project::new(dto.name, dto.start_date)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectDto {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// `null` reopens a completed project
    #[serde(default, deserialize_with = "double_option")]
    pub stop_date: Option<Option<NaiveDate>>,
    pub suspended: Option<bool>,
    pub managers: Option<Vec<Id>>,
    pub members: Option<Vec<Id>>,
}

impl UpdateProjectDto {
    /// Scalar fields only; manager and member lists go through the
    /// membership operations so role changes are applied
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(ref name) = self.name {
            project.name = name.clone();
        }
        if let Some(start_date) = self.start_date {
            project.start_date = start_date;
        }
        if let Some(stop_date) = self.stop_date {
            project.stop_date = stop_date;
        }
        if let Some(suspended) = self.suspended {
            project.suspended = suspended;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_is_derived() {
        let mut project = Project::new("Time Monkey", date(2024, 1, 1));
        assert_eq!(project.status(), ProjectStatus::Active);

        project.suspended = true;
        assert_eq!(project.status(), ProjectStatus::Suspended);

        project.stop_date = Some(date(2024, 6, 1));
        assert_eq!(project.status(), ProjectStatus::Completed);

        project.suspended = false;
        assert_eq!(project.status(), ProjectStatus::Completed);
    }

    #[test]
    fn test_membership_lookups() {
        let mut project = Project::new("Time Monkey", date(2024, 1, 1));
        project.managers = vec![3];
        project.members = vec![3, 5];
        assert!(project.is_manager(3));
        assert!(!project.is_manager(5));
        assert!(project.is_member(5));
    }

    #[test]
    fn test_update_distinguishes_null_stop_date() {
        let update: UpdateProjectDto = serde_json::from_str(r#"{"stopDate": null}"#).unwrap();
        assert_eq!(update.stop_date, Some(None));

        let update: UpdateProjectDto = serde_json::from_str(r#"{"name": "X"}"#).unwrap();
        assert_eq!(update.stop_date, None);

        let mut project = Project::new("Old", date(2024, 1, 1));
        project.stop_date = Some(date(2024, 2, 1));
        UpdateProjectDto {
            stop_date: Some(None),
            name: Some("New".into()),
            ..Default::default()
        }
        .apply_to(&mut project);
        assert_eq!(project.name, "New");
        assert_eq!(project.status(), ProjectStatus::Active);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Completed".parse::<ProjectStatus>(), Ok(ProjectStatus::Completed));
        assert!("error".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_name_length_is_validated() {
        let project = Project::new("x".repeat(65), date(2024, 1, 1));
        assert!(project.validate().is_err());
    }
}
