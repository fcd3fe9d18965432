//! # ss-core
//!
//! Foundational building blocks shared by every SheetStorm crate:
//! - the error taxonomy and `SsResult`
//! - entity traits
//! - the `WorkHours` duration type and month periods
//! - pagination parameters
//! - configuration

pub mod config;
pub mod error;
pub mod pagination;
pub mod period;
pub mod result;
pub mod traits;
pub mod types;

pub use error::*;
pub use pagination::*;
pub use period::*;
pub use result::*;
pub use traits::*;
pub use types::*;
