//! Route definitions for tags, mounted at `/tags`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// ```text
/// GET    /        -> list_tags
/// POST   /        -> create_tag
/// DELETE /{id}    -> delete_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags).post(tags::create_tag))
        .route("/{id}", delete(tags::delete_tag))
}
