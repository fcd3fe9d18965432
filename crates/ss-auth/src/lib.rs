//! # ss-auth
//!
//! Authentication for SheetStorm.
//!
//! ## Features
//!
//! - JWT bearer tokens
//! - Argon2 password hashing
//! - Resolving a request to the stored, active user

pub mod current_user;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use current_user::CurrentUser;
pub use jwt::{Claims, JwtError, JwtService};
pub use middleware::{AuthError, AuthResult, Authenticator, RequestHeaders};
pub use password::{hash_password, verify_password, PasswordError};
