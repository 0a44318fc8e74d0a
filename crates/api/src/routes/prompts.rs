//! Route definitions for prompts, mounted at `/prompts`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{prompts, tags};
use crate::state::AppState;

/// ```text
/// GET    /              -> list_prompts
/// POST   /              -> create_prompt
/// GET    /{id}          -> get_prompt
/// PUT    /{id}          -> update_prompt
/// DELETE /{id}          -> delete_prompt
/// GET    /{id}/tags     -> get_prompt_tags
/// PUT    /{id}/tags     -> set_prompt_tags
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(prompts::list_prompts).post(prompts::create_prompt))
        .route(
            "/{id}",
            get(prompts::get_prompt)
                .put(prompts::update_prompt)
                .delete(prompts::delete_prompt),
        )
        .route(
            "/{id}/tags",
            get(tags::get_prompt_tags).put(tags::set_prompt_tags),
        )
}
