//! One repository per table. Repositories are zero-sized; every method takes
//! the pool explicitly.

pub mod prompt_repo;
pub mod tag_repo;
pub mod user_repo;

pub use prompt_repo::PromptRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
