pub mod health;
pub mod prompts;
pub mod tags;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /session                     ensure user row, echo identity (GET)
/// /realtime                    WebSocket change feed
///
/// /prompts                     list, create
/// /prompts/{id}                get, update, delete
/// /prompts/{id}/tags           get, replace
///
/// /tags                        list, create
/// /tags/{id}                   delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(handlers::session::get_session))
        .route("/realtime", get(ws::ws_handler))
        .nest("/prompts", prompts::router())
        .nest("/tags", tags::router())
}
