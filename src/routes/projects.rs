use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::{violated_constraint, AppError};
use crate::models::{Project, ProjectProgress, Task};
use crate::routes::resource::{not_found, Resource};
use crate::routes::{StatusResponse, UserIdRequest};
use crate::state::SharedState;
use crate::validation;

#[derive(Deserialize)]
pub struct ProjectPayload {
    pub name: String,
    pub description: String,
    /// Defaults to the caller on create, unchanged on update.
    pub owner: Option<Uuid>,
}

fn validate(req: &ProjectPayload) -> Result<(), AppError> {
    validation::short_text("name", &req.name, 200)?;
    validation::not_blank("description", &req.description)
}

fn unknown_owner(e: sqlx::Error) -> AppError {
    match violated_constraint(&e) {
        Some("projects_owner_id_fkey") => {
            AppError::BadRequest("Invalid owner - user does not exist.".to_string())
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl Resource for Project {
    type Create = ProjectPayload;
    type Update = ProjectPayload;

    const NAME: &'static str = "Project";

    fn id(&self) -> Uuid {
        self.id
    }

    async fn list(pool: &PgPool) -> Result<Vec<Self>, AppError> {
        Ok(db::projects::list(pool).await?)
    }

    async fn retrieve(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        Ok(db::projects::find_by_id(pool, id).await?)
    }

    async fn create(
        pool: &PgPool,
        caller: Option<&AuthUser>,
        req: ProjectPayload,
    ) -> Result<Self, AppError> {
        validate(&req)?;

        let owner_id = match (req.owner, caller) {
            (Some(owner), _) => owner,
            (None, Some(caller)) => caller.user_id,
            (None, None) => {
                return Err(AppError::Unauthorized(
                    "Authentication credentials were not provided.".to_string(),
                ));
            }
        };

        db::projects::create(pool, &req.name, &req.description, owner_id)
            .await
            .map_err(unknown_owner)
    }

    async fn update(
        pool: &PgPool,
        id: Uuid,
        req: ProjectPayload,
    ) -> Result<Option<Self>, AppError> {
        validate(&req)?;

        db::projects::update(pool, id, &req.name, &req.description, req.owner)
            .await
            .map_err(unknown_owner)
    }

    async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        Ok(db::projects::delete(pool, id).await?)
    }
}

async fn require_project(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    if db::projects::exists(pool, id).await? {
        Ok(())
    } else {
        Err(not_found::<Project>())
    }
}

pub async fn list_tasks(
    _auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Vec<Task>>, AppError> {
    require_project(&state.pool, id).await?;
    let tasks = db::tasks::list_by_project(&state.pool, id).await?;
    Ok(Json(tasks))
}

pub async fn progress_summary(
    _auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<ProjectProgress>, AppError> {
    require_project(&state.pool, id).await?;
    let progress = db::projects::progress(&state.pool, id).await?;
    Ok(Json(progress))
}

pub async fn assign_owner(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(req), _): WithRejection<Json<UserIdRequest>, AppError>,
) -> Result<Json<StatusResponse>, AppError> {
    require_project(&state.pool, id).await?;

    let user_not_found = || AppError::NotFound("User not found".to_string());
    let user_id = req.user_id().ok_or_else(user_not_found)?;

    let updated = db::projects::set_owner(&state.pool, id, user_id)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("projects_owner_id_fkey") => user_not_found(),
            _ => AppError::Database(e),
        })?;
    if !updated {
        return Err(not_found::<Project>());
    }

    tracing::info!(project = %id, owner = %user_id, by = %auth.user_id, "project owner reassigned");

    Ok(StatusResponse::new("Owner updated"))
}
