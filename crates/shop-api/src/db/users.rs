//! User repository.

use shop_core::{ShopError, ShopResult, User};
use sqlx::PgPool;

/// Repository for user rows
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> ShopResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, is_admin, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a new user. The caller has already checked email uniqueness;
    /// the unique index on `LOWER(email)` is the backstop, and a concurrent
    /// duplicate surfaces as `AlreadyExists`, not as a database failure.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> ShopResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, full_name, is_admin, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ShopError::AlreadyExists,
            _ => e.into(),
        })?;

        Ok(user)
    }
}
