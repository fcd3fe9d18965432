//! Project contracts

mod base;
mod create;
mod delete;
mod membership;
mod update;

pub use base::ProjectBaseContract;
pub use create::CreateProjectContract;
pub use delete::DeleteProjectContract;
pub use membership::{
    JoinProjectContract, ManageMembershipContract, MembershipAction, MembershipChange,
    MembershipRole,
};
pub use update::{authorize_project_management, UpdateProjectContract};

use crate::base::UserContext;
use ss_models::Project;

/// Admins see every project, everyone else the ones they belong to
pub fn can_view_project<U: UserContext>(user: &U, project: &Project) -> bool {
    user.is_admin()
        || project.is_manager(user.id())
        || project.is_member(user.id())
}

/// Project list screens are for admins and managers only
pub fn can_list_projects<U: UserContext>(user: &U) -> bool {
    user.is_admin_or_manager()
}
