pub mod prompts;
pub mod session;
pub mod tags;
