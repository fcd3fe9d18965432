//! # ss-api
//!
//! REST API handlers for SheetStorm.
//!
//! Bodies are HAL+JSON; every endpoint lives under `/api/v1` and expects a
//! bearer token, except signup and login.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod representers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
