//! User account types.
//!
//! `User` is the full database record; `PublicUser` is the shape returned to
//! clients and never carries the password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, as stored. Immutable after registration in this scope.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Client-safe projection
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// User shape safe for client responses (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
}
