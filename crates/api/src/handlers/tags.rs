//! Handlers for tags and prompt-tag assignment.
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptcubic_core::error::CoreError;
use promptcubic_core::prompt::ENTITY_PROMPT;
use promptcubic_core::tag::{normalize_tag_name, validate_tag_name, ENTITY_TAG};
use promptcubic_core::types::DbId;
use promptcubic_db::models::tag::{CreateTag, SetPromptTags};
use promptcubic_db::repositories::{PromptRepo, TagRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/tags
pub async fn list_tags(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(tags))
}

/// POST /api/tags
///
/// Create a tag. The name is normalized; a duplicate name for the same user
/// is a 409.
pub async fn create_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTag>,
) -> AppResult<impl IntoResponse> {
    validate_tag_name(&input.name)?;
    let name = normalize_tag_name(&input.name);

    UserRepo::ensure(&state.pool, auth.user_id).await?;
    let tag = TagRepo::create(&state.pool, auth.user_id, &name).await?;

    tracing::info!(tag_id = %tag.id, user_id = %auth.user_id, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// DELETE /api/tags/{id}
///
/// Delete a tag; it is detached from every prompt.
pub async fn delete_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(tag_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TagRepo::delete(&state.pool, tag_id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::not_found(ENTITY_TAG, tag_id)));
    }

    tracing::info!(%tag_id, user_id = %auth.user_id, "Tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/prompts/{id}/tags
pub async fn get_prompt_tags(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(prompt_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    // Distinguish "no tags" from "no such prompt".
    PromptRepo::find_for_user(&state.pool, prompt_id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(ENTITY_PROMPT, prompt_id)))?;

    let tags = TagRepo::tags_for_prompt(&state.pool, prompt_id, auth.user_id).await?;
    Ok(Json(tags))
}

/// PUT /api/prompts/{id}/tags
///
/// Replace the prompt's tag set. Ids of tags the caller does not own are
/// ignored.
pub async fn set_prompt_tags(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(prompt_id): AppPath<DbId>,
    AppJson(input): AppJson<SetPromptTags>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::set_prompt_tags(&state.pool, prompt_id, auth.user_id, &input.tag_ids)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(ENTITY_PROMPT, prompt_id)))?;

    tracing::info!(%prompt_id, count = tags.len(), "Prompt tags replaced");
    Ok(Json(tags))
}
