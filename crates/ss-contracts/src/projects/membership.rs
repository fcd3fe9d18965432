//! Adding and removing project managers and members

use ss_core::error::ValidationErrors;
use ss_models::{Project, User};

use super::update::authorize_project_management;
use crate::base::{Contract, PermissionResult, UserContext, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipRole {
    Manager,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Add,
    Remove,
}

pub struct MembershipChange<'p> {
    pub project: &'p Project,
    pub target: &'p User,
    pub role: MembershipRole,
    pub action: MembershipAction,
}

pub struct ManageMembershipContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> ManageMembershipContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, 'p, U: UserContext> Contract<MembershipChange<'p>> for ManageMembershipContract<'a, U> {
    fn authorize(&self, entity: &MembershipChange<'p>) -> PermissionResult {
        authorize_project_management(self.user, entity.project)
    }

    fn validate(&self, entity: &MembershipChange<'p>) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if entity.action == MembershipAction::Add && !entity.target.is_active {
            errors.add("user", "Inactive users can not be added to projects");
        }
        errors.into_result()
    }
}

/// A user adding themselves to a project as member
pub struct JoinProjectContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> JoinProjectContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }
}

impl<'a, U: UserContext> Contract<Project> for JoinProjectContract<'a, U> {
    fn validate(&self, entity: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if !entity.is_active() {
            errors.add("project", "You can only join active projects");
        }
        if entity.is_member(self.user.id()) {
            errors.add("project", "You are already a member of this project");
        }
        errors.into_result()
    }
}
