//! Request extractors whose rejections use the API's JSON error body.
//!
//! `axum::Json` and `axum::extract::Path` reject with plain text. These
//! wrappers route the rejection through [`AppError`] so a malformed body or
//! id comes back as `{"error": ..., "code": "BAD_REQUEST"}` like any other
//! client error.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
