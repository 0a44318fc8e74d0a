//! Session bootstrap.
//!
//! The identity provider owns sign-in; once a client holds a token it calls
//! `GET /api/session` so the user has a local row before creating anything.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use promptcubic_db::models::user::User;
use promptcubic_db::repositories::UserRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of `GET /api/session`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub email: Option<String>,
    pub role: String,
}

/// GET /api/session
///
/// Upsert the caller's `users` row and echo the token identity.
pub async fn get_session(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::ensure(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = %user.id, "User ensured in database");

    Ok(Json(SessionResponse {
        user,
        email: auth.email,
        role: auth.role,
    }))
}
