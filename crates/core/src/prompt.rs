//! Prompt field rules.
//!
//! Prompts carry a title and a markdown body. The only rule is that both are
//! present: the markdown itself is opaque here and rendered by the front end.

use crate::error::CoreError;

/// Entity name used in `NotFound` errors and log fields.
pub const ENTITY_PROMPT: &str = "Prompt";

/// Confirmation message returned after a successful delete.
pub const DELETED_MESSAGE: &str = "Prompt deleted successfully";

/// Reject a blank title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    Ok(())
}

/// Reject blank content.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Content must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate both required prompt fields, title first.
pub fn validate_prompt_fields(title: &str, content: &str) -> Result<(), CoreError> {
    validate_title(title)?;
    validate_content(content)
}
