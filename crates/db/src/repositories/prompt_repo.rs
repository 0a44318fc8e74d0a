//! Repository for the `prompts` table.
//!
//! Every method takes the caller's `user_id` and filters on it, so a prompt
//! owned by someone else behaves exactly like a missing one.

use promptcubic_core::types::DbId;
use sqlx::PgPool;

use crate::models::prompt::{CreatePrompt, Prompt, UpdatePrompt};

/// Column list for prompts queries.
const COLUMNS: &str = "id, title, content, user_id, created_at, updated_at";

/// Provides CRUD operations for prompts.
pub struct PromptRepo;

impl PromptRepo {
    /// Insert a new prompt owned by `user_id`. Returns the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreatePrompt,
    ) -> Result<Prompt, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompts (title, content, user_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// List the user's prompts, oldest first, so newly created prompts land
    /// at the end of the list.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Prompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts
             WHERE user_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find one of the user's prompts by id.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace title and content. `updated_at` is set by trigger.
    ///
    /// Returns `None` if the prompt does not exist or is not the user's.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdatePrompt,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET
                title   = $1,
                content = $2
             WHERE id = $3 AND user_id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete one of the user's prompts. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
