//! Domain error type shared by every PromptCubic crate.

use crate::types::DbId;

/// Errors raised by domain rules, independent of transport.
///
/// The API layer maps each variant to an HTTP status; the client maps
/// transport failures into its own error type and never constructs these.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The row does not exist or is not visible to the caller.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A required field is missing or blank.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (e.g. duplicate tag name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No usable credentials were presented.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials are valid but do not allow the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }
}
