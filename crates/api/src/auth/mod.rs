//! Access-token verification.
//!
//! Sign-up, sign-in, and session issuance belong to the hosted identity
//! provider. This service only checks the HS256 access tokens it hands out.

pub mod jwt;
