//! Repository for the `users` table.

use promptcubic_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, updated_at";

/// Mirrors identity-provider users into the local `users` table.
pub struct UserRepo;

impl UserRepo {
    /// Insert the user if missing, otherwise bump `updated_at`.
    ///
    /// Called on every sign-in so the foreign keys on `prompts` and `tags`
    /// always have a parent row.
    pub async fn ensure(pool: &PgPool, id: DbId) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id) VALUES ($1)
             ON CONFLICT (id) DO UPDATE SET updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user and, by cascade, their prompts and tags.
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
