//! Tag and prompt-tag models and DTOs.

use promptcubic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// A row from the `prompt_tags` junction table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PromptTag {
    pub prompt_id: DbId,
    pub tag_id: DbId,
}

/// Body of `POST /api/tags`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTag {
    pub name: String,
}

/// Body of `PUT /api/prompts/{id}/tags`. Replaces the prompt's tag set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SetPromptTags {
    pub tag_ids: Vec<DbId>,
}
