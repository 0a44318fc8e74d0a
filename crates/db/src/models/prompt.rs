//! Prompt model and DTOs.

use promptcubic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `prompts` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    pub id: DbId,
    pub title: String,
    /// Markdown source, stored verbatim.
    pub content: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /api/prompts`. The owner comes from the access token.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatePrompt {
    pub title: String,
    pub content: String,
}

/// Body of `PUT /api/prompts/{id}`. Both fields are replaced.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdatePrompt {
    pub title: String,
    pub content: String,
}
