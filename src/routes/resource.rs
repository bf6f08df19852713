//! Shared CRUD plumbing. Every entity exposed under `/api` implements
//! [`Resource`]; the generic handlers below turn it into the standard
//! list / create / retrieve / update / delete endpoints. Entity-specific
//! actions live next to each implementation.

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::state::SharedState;

#[async_trait]
pub trait Resource: Serialize + Send + Sync + Sized + 'static {
    /// Body accepted by `POST` on the collection.
    type Create: DeserializeOwned + Send + 'static;
    /// Body accepted by `PUT` on an item.
    type Update: DeserializeOwned + Send + 'static;

    /// Singular name used in messages and logs, e.g. `"Project"`.
    const NAME: &'static str;

    /// Whether anonymous callers may create entries (self-signup).
    const ANONYMOUS_CREATE: bool = false;

    fn id(&self) -> Uuid;

    async fn list(pool: &PgPool) -> Result<Vec<Self>, AppError>;

    async fn retrieve(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError>;

    async fn create(
        pool: &PgPool,
        caller: Option<&AuthUser>,
        req: Self::Create,
    ) -> Result<Self, AppError>;

    /// `Ok(None)` when no entry has this id.
    async fn update(pool: &PgPool, id: Uuid, req: Self::Update) -> Result<Option<Self>, AppError>;

    /// `Ok(false)` when no entry has this id.
    async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError>;
}

pub fn not_found<R: Resource>() -> AppError {
    AppError::NotFound(format!("{} not found", R::NAME))
}

pub async fn list<R: Resource>(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<R>>, AppError> {
    let items = R::list(&state.pool).await?;
    Ok(Json(items))
}

pub async fn create<R: Resource>(
    caller: Option<AuthUser>,
    State(state): State<SharedState>,
    body: Result<Json<R::Create>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), AppError> {
    // Permission is checked before the body is looked at.
    if caller.is_none() && !R::ANONYMOUS_CREATE {
        return Err(AppError::Unauthorized(
            "Authentication credentials were not provided.".to_string(),
        ));
    }
    let Json(req) = body?;

    let item = R::create(&state.pool, caller.as_ref(), req).await?;

    tracing::info!(
        resource = R::NAME,
        id = %item.id(),
        by = ?caller.as_ref().map(|c| c.user_id),
        "created"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn retrieve<R: Resource>(
    _auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<R>, AppError> {
    R::retrieve(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(not_found::<R>)
}

pub async fn update<R: Resource>(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(req), _): WithRejection<Json<R::Update>, AppError>,
) -> Result<Json<R>, AppError> {
    let item = R::update(&state.pool, id, req)
        .await?
        .ok_or_else(not_found::<R>)?;

    tracing::info!(resource = R::NAME, %id, by = %auth.user_id, "updated");

    Ok(Json(item))
}

pub async fn delete<R: Resource>(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<StatusCode, AppError> {
    if !R::delete(&state.pool, id).await? {
        return Err(not_found::<R>());
    }

    tracing::info!(resource = R::NAME, %id, by = %auth.user_id, "deleted");

    Ok(StatusCode::NO_CONTENT)
}
