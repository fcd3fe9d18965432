//! User contracts

mod base;
mod create;
mod signup;
mod update;

pub use base::{age_on, validate_password, UserBaseContract, MAXIMAL_AGE, MINIMAL_AGE};
pub use create::CreateUserContract;
pub use signup::SignupContract;
pub use update::UpdateUserContract;
