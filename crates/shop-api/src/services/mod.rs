//! Application services.

pub mod auth;

pub use auth::{AuthService, Claims};
