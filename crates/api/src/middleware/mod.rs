//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`auth::RealtimeAuth`] -- Same, but also accepts `?access_token=` for
//!   WebSocket upgrades, where browsers cannot set headers.

pub mod auth;
