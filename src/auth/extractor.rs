use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::auth::token::TokenCredentials;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

/// The caller identified by an `Authorization: Token <key>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(credentials)) =
            <TypedHeader<Authorization<TokenCredentials>> as FromRequestParts<SharedState>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::Unauthorized(
                            "Authentication credentials were not provided.".to_string(),
                        )
                    } else {
                        AppError::Unauthorized("Invalid token header.".to_string())
                    }
                })?;

        let user = db::auth_tokens::find_user_by_key(&state.pool, credentials.key())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token.".to_string()))?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            token: credentials.key().to_string(),
        })
    }
}

/// Anonymous when no `Authorization` header is sent; a header that is
/// present but invalid is still rejected.
impl OptionalFromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(None);
        }
        <AuthUser as FromRequestParts<SharedState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
