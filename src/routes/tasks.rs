use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::{violated_constraint, AppError};
use crate::models::{ProjectTaskCount, Task, TaskStatus};
use crate::routes::resource::{not_found, Resource};
use crate::routes::{StatusResponse, UserIdRequest};
use crate::state::SharedState;
use crate::validation;

#[derive(Deserialize)]
pub struct TaskPayload {
    pub title: String,
    pub project: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub assignee: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    /// Kept loose so any bad value gets the same "invalid status" answer.
    pub status: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct TasksByUserQuery {
    pub user_id: Option<String>,
}

fn validate(req: &TaskPayload) -> Result<(), AppError> {
    validation::short_text("title", &req.title, 200)
}

fn unknown_reference(e: sqlx::Error) -> AppError {
    match violated_constraint(&e) {
        Some("tasks_project_id_fkey") => {
            AppError::BadRequest("Invalid project - project does not exist.".to_string())
        }
        Some("tasks_assignee_id_fkey") => {
            AppError::BadRequest("Invalid assignee - user does not exist.".to_string())
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl Resource for Task {
    type Create = TaskPayload;
    type Update = TaskPayload;

    const NAME: &'static str = "Task";

    fn id(&self) -> Uuid {
        self.id
    }

    async fn list(pool: &PgPool) -> Result<Vec<Self>, AppError> {
        Ok(db::tasks::list(pool).await?)
    }

    async fn retrieve(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        Ok(db::tasks::find_by_id(pool, id).await?)
    }

    async fn create(
        pool: &PgPool,
        _caller: Option<&AuthUser>,
        req: TaskPayload,
    ) -> Result<Self, AppError> {
        validate(&req)?;

        db::tasks::create(
            pool,
            &req.title,
            req.description.as_deref(),
            req.status.unwrap_or_default(),
            req.project,
            req.assignee,
        )
        .await
        .map_err(unknown_reference)
    }

    async fn update(pool: &PgPool, id: Uuid, req: TaskPayload) -> Result<Option<Self>, AppError> {
        validate(&req)?;

        db::tasks::update(
            pool,
            id,
            &req.title,
            req.description.as_deref(),
            req.status,
            req.project,
            req.assignee,
        )
        .await
        .map_err(unknown_reference)
    }

    async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        Ok(db::tasks::delete(pool, id).await?)
    }
}

pub async fn mark_completed(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<StatusResponse>, AppError> {
    if !db::tasks::set_status(&state.pool, id, TaskStatus::Completed).await? {
        return Err(not_found::<Task>());
    }

    tracing::info!(task = %id, by = %auth.user_id, "task marked completed");

    Ok(StatusResponse::new("Task marked as completed"))
}

pub async fn assign_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(req), _): WithRejection<Json<UserIdRequest>, AppError>,
) -> Result<Json<StatusResponse>, AppError> {
    let user_not_found = || AppError::NotFound("User not found".to_string());

    let Some(user_id) = req.user_id() else {
        // Still report a missing task first.
        db::tasks::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(not_found::<Task>)?;
        return Err(user_not_found());
    };

    let updated = db::tasks::set_assignee(&state.pool, id, Some(user_id))
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("tasks_assignee_id_fkey") => user_not_found(),
            _ => AppError::Database(e),
        })?;
    if !updated {
        return Err(not_found::<Task>());
    }

    tracing::info!(task = %id, assignee = %user_id, by = %auth.user_id, "task assigned");

    Ok(StatusResponse::new("User assigned"))
}

pub async fn unassign_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<StatusResponse>, AppError> {
    if !db::tasks::set_assignee(&state.pool, id, None).await? {
        return Err(not_found::<Task>());
    }

    tracing::info!(task = %id, by = %auth.user_id, "task unassigned");

    Ok(StatusResponse::new("User removed from task"))
}

pub async fn change_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(req), _): WithRejection<Json<ChangeStatusRequest>, AppError>,
) -> Result<Json<StatusResponse>, AppError> {
    let status: TaskStatus = req
        .status
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::BadRequest("invalid status".to_string()))?;

    if !db::tasks::set_status(&state.pool, id, status).await? {
        return Err(not_found::<Task>());
    }

    tracing::info!(task = %id, %status, by = %auth.user_id, "task status changed");

    Ok(StatusResponse::new(format!("Status changed to {status}")))
}

pub async fn tasks_by_user(
    _auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Query(query), _): WithRejection<Query<TasksByUserQuery>, AppError>,
) -> Result<Json<Vec<Task>>, AppError> {
    let raw = query
        .user_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;
    let user_id: Uuid = raw
        .parse()
        .map_err(|_| AppError::BadRequest("user_id must be a valid id".to_string()))?;

    let tasks = db::tasks::list_by_assignee(&state.pool, user_id).await?;
    Ok(Json(tasks))
}

pub async fn task_count_by_project(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<ProjectTaskCount>>, AppError> {
    let counts = db::tasks::count_by_project_name(&state.pool).await?;
    Ok(Json(counts))
}
