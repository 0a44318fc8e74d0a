//! User row model.

use promptcubic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// The id is the identity provider's subject; no credentials are stored here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
