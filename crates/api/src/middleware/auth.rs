//! JWT-based authentication extractors for Axum handlers.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use promptcubic_core::error::CoreError;
use promptcubic_core::types::DbId;
use serde::Deserialize;

use crate::auth::jwt::{validate_token, JwtConfig, ANON_ROLE};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity provider's user id (from `claims.sub`).
    pub user_id: DbId,
    /// Email claim, if present.
    pub email: Option<String>,
    /// Provider role claim, e.g. `"authenticated"`.
    pub role: String,
}

impl AuthUser {
    /// Verify a raw token and build the caller from its claims.
    ///
    /// A well-signed token carrying the `anon` role is refused with 403:
    /// prompts always belong to a signed-in user.
    pub fn from_token(token: &str, config: &JwtConfig) -> Result<Self, AppError> {
        let claims = validate_token(token, config)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;
        if claims.role == ANON_ROLE {
            return Err(AppError::Core(CoreError::Forbidden(
                "Sign-in required".to_string(),
            )));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// `Ok(None)` when the header is absent, `Err` when it is malformed.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let header = value
        .to_str()
        .map_err(|_| AppError::unauthorized("Malformed Authorization header"))?;
    header.strip_prefix("Bearer ").map(Some).ok_or_else(|| {
        AppError::unauthorized("Invalid Authorization format. Expected: Bearer <token>")
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        AuthUser::from_token(token, &state.config.jwt)
    }
}

/// Query string accepted on the realtime upgrade request.
#[derive(Debug, Deserialize)]
struct TokenQuery {
    access_token: Option<String>,
}

/// Caller of the realtime endpoint.
///
/// Prefers the `Authorization` header and falls back to the
/// `access_token` query parameter.
#[derive(Debug, Clone)]
pub struct RealtimeAuth(pub AuthUser);

impl FromRequestParts<AppState> for RealtimeAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(parts)? {
            return AuthUser::from_token(token, &state.config.jwt).map(RealtimeAuth);
        }

        let Query(query) = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::BadRequest("Malformed query string".into()))?;
        let token = query
            .access_token
            .ok_or_else(|| AppError::unauthorized("Missing access token"))?;

        AuthUser::from_token(&token, &state.config.jwt).map(RealtimeAuth)
    }
}
