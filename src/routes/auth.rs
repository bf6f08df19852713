use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthUser;
use crate::auth::{password, token};
use crate::db;
use crate::error::AppError;
use crate::models::UserProfile;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

fn invalid_credentials() -> AppError {
    AppError::BadRequest("Unable to log in with provided credentials.".to_string())
}

/// Exchange username and password for the user's token. The same token is
/// handed out on every login until it is revoked by `logout`.
pub async fn login(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Must include \"username\" and \"password\".".to_string(),
        ));
    }

    let Some(user) = db::users::find_by_username(&state.pool, &req.username).await? else {
        password::verify_dummy(&req.password);
        tracing::warn!(username = %req.username, "login for unknown user");
        return Err(invalid_credentials());
    };

    if !password::verify(&req.password, &user.password_hash) {
        tracing::warn!(username = %req.username, "failed login attempt");
        return Err(invalid_credentials());
    }

    let stored = db::auth_tokens::get_or_create(&state.pool, user.id, &token::generate_key()).await?;

    tracing::info!(user = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        token: stored.key,
        user: user.into(),
    }))
}

/// Revoke the caller's token. The next login issues a new one.
pub async fn logout(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<StatusCode, AppError> {
    db::auth_tokens::delete_by_key(&state.pool, &auth.token).await?;

    tracing::info!(user = %auth.user_id, "user logged out");

    Ok(StatusCode::NO_CONTENT)
}
