//! Shared domain vocabulary for PromptCubic.
//!
//! Everything here is free of I/O so the database, API, and client crates can
//! agree on ids, timestamps, errors, and field rules.

pub mod change;
pub mod error;
pub mod prompt;
pub mod tag;
pub mod types;
