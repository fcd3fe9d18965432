//! Result alias for business operations

use crate::error::SsError;

/// Expected failures (validation, permissions, missing rows) travel as
/// `SsError` variants; nothing on this path panics.
pub type SsResult<T> = Result<T, SsError>;
