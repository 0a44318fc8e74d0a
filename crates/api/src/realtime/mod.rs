//! Delivery of change events to realtime subscribers.

pub mod router;

pub use router::ChangeRouter;
