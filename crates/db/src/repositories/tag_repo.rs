//! Repository for the `tags` and `prompt_tags` tables.

use promptcubic_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::Tag;

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "id, name, user_id, created_at";

/// Provides tag CRUD and prompt-tag associations.
pub struct TagRepo;

impl TagRepo {
    /// Create a tag for the user. The name is stored as given; callers
    /// normalize it first. A duplicate name violates `uq_tags_user_name`.
    pub async fn create(pool: &PgPool, user_id: DbId, name: &str) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, user_id) VALUES ($1, $2) RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// List the user's tags alphabetically.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE user_id = $1 ORDER BY name");
        sqlx::query_as::<_, Tag>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete one of the user's tags; its prompt associations cascade.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tags attached to one of the user's prompts, alphabetically.
    pub async fn tags_for_prompt(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.user_id, t.created_at \
             FROM tags t \
             JOIN prompt_tags pt ON pt.tag_id = t.id \
             JOIN prompts p ON p.id = pt.prompt_id \
             WHERE pt.prompt_id = $1 AND p.user_id = $2 \
             ORDER BY t.name",
        )
        .bind(prompt_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the tag set of one of the user's prompts in a single
    /// transaction.
    ///
    /// Tag ids that do not belong to the user are ignored. Returns `None` if
    /// the prompt does not exist or is not the user's, otherwise the new set.
    pub async fn set_prompt_tags(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<Option<Vec<Tag>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owned: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM prompts WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(prompt_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM prompt_tags WHERE prompt_id = $1")
            .bind(prompt_id)
            .execute(&mut *tx)
            .await?;

        let attached = sqlx::query(
            "INSERT INTO prompt_tags (prompt_id, tag_id) \
             SELECT $1, id FROM tags WHERE id = ANY($2) AND user_id = $3 \
             ON CONFLICT DO NOTHING",
        )
        .bind(prompt_id)
        .bind(tag_ids)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        tracing::debug!(
            %prompt_id,
            requested = tag_ids.len(),
            attached,
            "Replaced prompt tags"
        );

        Self::tags_for_prompt(pool, prompt_id, user_id)
            .await
            .map(Some)
    }
}
