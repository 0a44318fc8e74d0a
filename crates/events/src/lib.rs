//! PromptCubic change feed plumbing.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ChangeEvent`] — one committed write to a watched table.
//! - [`ChangeListener`] — background service that turns Postgres
//!   `NOTIFY` messages into [`ChangeEvent`]s on the bus.

pub mod bus;
pub mod listener;

pub use bus::{ChangeEvent, EventBus};
pub use listener::{ChangeListener, ListenerConfig};
