//! Tag name rules.

use crate::error::CoreError;

/// Entity name used in `NotFound` errors and log fields.
pub const ENTITY_TAG: &str = "Tag";

/// Trim the name and collapse runs of internal whitespace to a single space.
///
/// Casing is preserved; two tags differing only in case are distinct.
pub fn normalize_tag_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reject a name that is blank after normalization.
pub fn validate_tag_name(name: &str) -> Result<(), CoreError> {
    if normalize_tag_name(name).is_empty() {
        return Err(CoreError::Validation(
            "Tag name must not be empty".to_string(),
        ));
    }
    Ok(())
}
