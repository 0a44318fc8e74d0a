//! Client side of the prompt dashboard.
//!
//! [`PromptApi`] talks to the REST endpoints, [`RealtimeSubscription`]
//! listens for change notices, and [`PromptSync`] keeps a [`PromptBoard`]
//! in step with the server. Nothing here renders anything; a UI reads the
//! board and form state and calls back into the sync loop.

pub mod api;
pub mod board;
pub mod error;
pub mod form;
pub mod subscription;
pub mod sync;

pub use api::PromptApi;
pub use board::PromptBoard;
pub use error::ClientError;
pub use form::{FormMode, PromptDraft, PromptForm};
pub use subscription::{ChangeNotice, RealtimeSubscription, ReconnectConfig};
pub use sync::PromptSync;
