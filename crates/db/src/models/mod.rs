//! Row structs and request DTOs, one module per table.

pub mod prompt;
pub mod tag;
pub mod user;
