//! Handlers for prompt CRUD.
//!
//! Each handler is a thin pass-through to [`PromptRepo`], scoped to the
//! authenticated caller. Change notification is not done here: the
//! `notify_prompt_change` trigger announces every committed write.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptcubic_core::error::CoreError;
use promptcubic_core::prompt::{validate_prompt_fields, DELETED_MESSAGE, ENTITY_PROMPT};
use promptcubic_core::types::DbId;
use promptcubic_db::models::prompt::{CreatePrompt, UpdatePrompt};
use promptcubic_db::repositories::{PromptRepo, UserRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/prompts
// ---------------------------------------------------------------------------

/// Create a prompt owned by the caller.
///
/// Ensures the caller's `users` row first so a client that skipped
/// `/api/session` does not trip the foreign key.
pub async fn create_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePrompt>,
) -> AppResult<impl IntoResponse> {
    validate_prompt_fields(&input.title, &input.content)?;

    UserRepo::ensure(&state.pool, auth.user_id).await?;
    let created = PromptRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(prompt_id = %created.id, user_id = %auth.user_id, "Prompt created");
    Ok((StatusCode::CREATED, Json(created)))
}

// ---------------------------------------------------------------------------
// GET /api/prompts
// ---------------------------------------------------------------------------

/// List the caller's prompts, oldest first.
pub async fn list_prompts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let prompts = PromptRepo::list_for_user(&state.pool, auth.user_id).await?;
    tracing::debug!(count = prompts.len(), user_id = %auth.user_id, "Listed prompts");
    Ok(Json(prompts))
}

// ---------------------------------------------------------------------------
// GET /api/prompts/{id}
// ---------------------------------------------------------------------------

/// Fetch one of the caller's prompts.
pub async fn get_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = PromptRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(ENTITY_PROMPT, id)))?;
    Ok(Json(prompt))
}

// ---------------------------------------------------------------------------
// PUT /api/prompts/{id}
// ---------------------------------------------------------------------------

/// Replace title and content of one of the caller's prompts.
pub async fn update_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdatePrompt>,
) -> AppResult<impl IntoResponse> {
    validate_prompt_fields(&input.title, &input.content)?;

    let updated = PromptRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(ENTITY_PROMPT, id)))?;

    tracing::info!(prompt_id = %id, user_id = %auth.user_id, "Prompt updated");
    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// DELETE /api/prompts/{id}
// ---------------------------------------------------------------------------

/// Delete one of the caller's prompts.
pub async fn delete_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PromptRepo::delete(&state.pool, id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found(ENTITY_PROMPT, id)));
    }

    tracing::info!(prompt_id = %id, user_id = %auth.user_id, "Prompt deleted");
    Ok(Json(json!({ "message": DELETED_MESSAGE })))
}
