//! Managers and members, and the role changes they cause

use ss_contracts::base::UserContext;
use ss_contracts::projects::{
    JoinProjectContract, ManageMembershipContract, MembershipAction, MembershipChange,
    MembershipRole,
};
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_db::RoleChange;
use ss_models::{Project, UserType};

use super::ProjectService;
use crate::base::check;

/// Role of a user who was just made a project manager
pub fn promoted_role(current: UserType) -> UserType {
    match current {
        UserType::Employee => UserType::Manager,
        other => other,
    }
}

/// Role of a user who just stopped managing a project
pub fn demoted_role(current: UserType, still_manages_projects: bool) -> UserType {
    match current {
        UserType::Manager if !still_manages_projects => UserType::Employee,
        other => other,
    }
}

impl ProjectService {
    async fn change_membership<U: UserContext>(
        &self,
        actor: &U,
        project_id: Id,
        user_id: Id,
        role: MembershipRole,
        action: MembershipAction,
    ) -> SsResult<Project> {
        let mut project = self.find(project_id).await?;
        let target = self
            .stores
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ss_core::error::SsError::not_found("User", user_id))?;

        let change = MembershipChange {
            project: &project,
            target: &target,
            role,
            action,
        };
        check(&ManageMembershipContract::new(actor), &change)?;

        match (role, action) {
            (MembershipRole::Manager, MembershipAction::Add) => {
                add_unique(&mut project.managers, user_id);
                add_unique(&mut project.members, user_id);
            }
            (MembershipRole::Manager, MembershipAction::Remove) => {
                project.managers.retain(|id| *id != user_id);
            }
            (MembershipRole::Member, MembershipAction::Add) => {
                add_unique(&mut project.members, user_id);
            }
            (MembershipRole::Member, MembershipAction::Remove) => {
                project.members.retain(|id| *id != user_id);
            }
        }

        let roles = match (role, action) {
            (MembershipRole::Manager, MembershipAction::Add) => {
                self.role_changes(Some(project_id), &[user_id], &[]).await?
            }
            (MembershipRole::Manager, MembershipAction::Remove) => {
                self.role_changes(Some(project_id), &[], &[user_id]).await?
            }
            (MembershipRole::Member, _) => Vec::new(),
        };

        let project = self.stores.projects.update(&project, &roles).await?;
        log_role_changes(&roles);
        Ok(project)
    }

    /// Roles that follow from `added` and `removed` managers of a project.
    /// `project_id` is left out when asking whether a user still manages
    /// something, since its stored manager set is about to change.
    pub(crate) async fn role_changes(
        &self,
        project_id: Option<Id>,
        added: &[Id],
        removed: &[Id],
    ) -> SsResult<Vec<RoleChange>> {
        let mut changes = Vec::new();
        for user_id in added {
            if let Some(user) = self.stores.users.find_by_id(*user_id).await? {
                let role = promoted_role(user.user_type);
                if role != user.user_type {
                    changes.push(RoleChange {
                        user_id: *user_id,
                        user_type: role,
                    });
                }
            }
        }
        for user_id in removed {
            if let Some(user) = self.stores.users.find_by_id(*user_id).await? {
                let still_manages = self
                    .stores
                    .projects
                    .list_managed_by(*user_id)
                    .await?
                    .iter()
                    .any(|p| p.id != project_id);
                let role = demoted_role(user.user_type, still_manages);
                if role != user.user_type {
                    changes.push(RoleChange {
                        user_id: *user_id,
                        user_type: role,
                    });
                }
            }
        }
        Ok(changes)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub async fn add_manager<U: UserContext>(&self, actor: &U, project_id: Id, user_id: Id) -> SsResult<Project> {
        self.change_membership(actor, project_id, user_id, MembershipRole::Manager, MembershipAction::Add)
            .await
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub async fn remove_manager<U: UserContext>(&self, actor: &U, project_id: Id, user_id: Id) -> SsResult<Project> {
        self.change_membership(actor, project_id, user_id, MembershipRole::Manager, MembershipAction::Remove)
            .await
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub async fn add_member<U: UserContext>(&self, actor: &U, project_id: Id, user_id: Id) -> SsResult<Project> {
        self.change_membership(actor, project_id, user_id, MembershipRole::Member, MembershipAction::Add)
            .await
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub async fn remove_member<U: UserContext>(&self, actor: &U, project_id: Id, user_id: Id) -> SsResult<Project> {
        self.change_membership(actor, project_id, user_id, MembershipRole::Member, MembershipAction::Remove)
            .await
    }

    /// The acting user joins an active project as member
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub async fn join<U: UserContext>(&self, actor: &U, project_id: Id) -> SsResult<Project> {
        let mut project = self.find(project_id).await?;
        check(&JoinProjectContract::new(actor), &project)?;
        add_unique(&mut project.members, actor.id());
        Ok(self.stores.projects.update(&project, &[]).await?)
    }
}

pub(crate) fn log_role_changes(roles: &[RoleChange]) {
    for change in roles {
        tracing::info!("User {} is now {}", change.user_id, change.user_type);
    }
}

pub(crate) fn add_unique(ids: &mut Vec<Id>, id: Id) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}
