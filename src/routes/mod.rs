pub mod auth;
pub mod projects;
pub mod resource;
pub mod tasks;
pub mod users;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Project, Task, UserProfile};
use crate::state::SharedState;

/// Body of the assignment actions. `user_id` is taken as raw JSON so that a
/// malformed id is reported as an unknown user rather than a bad body.
#[derive(Deserialize)]
pub struct UserIdRequest {
    pub user_id: Option<serde_json::Value>,
}

impl UserIdRequest {
    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id.as_ref()?.as_str()?.parse().ok()
    }
}

/// Confirmation returned by the custom actions.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Json<Self> {
        Json(StatusResponse {
            status: status.into(),
        })
    }
}

/// Routes served under `/api`.
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/auth/login/", post(auth::login))
        .route("/auth/logout/", post(auth::logout))
        // Users
        .route(
            "/usuarios/",
            get(resource::list::<UserProfile>).post(resource::create::<UserProfile>),
        )
        .route(
            "/usuarios/{id}/",
            get(resource::retrieve::<UserProfile>)
                .put(resource::update::<UserProfile>)
                .delete(resource::delete::<UserProfile>),
        )
        // Projects
        .route(
            "/projetos/",
            get(resource::list::<Project>).post(resource::create::<Project>),
        )
        .route(
            "/projetos/{id}/",
            get(resource::retrieve::<Project>)
                .put(resource::update::<Project>)
                .delete(resource::delete::<Project>),
        )
        .route("/projetos/{id}/tarefas_do_projeto/", get(projects::list_tasks))
        .route("/projetos/{id}/resumo_progresso/", get(projects::progress_summary))
        .route(
            "/projetos/{id}/atribuir_proprietario/",
            post(projects::assign_owner),
        )
        // Tasks
        .route(
            "/tarefas/",
            get(resource::list::<Task>).post(resource::create::<Task>),
        )
        .route("/tarefas/tarefas_por_usuario/", get(tasks::tasks_by_user))
        .route(
            "/tarefas/numero_tarefas_por_projeto/",
            get(tasks::task_count_by_project),
        )
        .route(
            "/tarefas/{id}/",
            get(resource::retrieve::<Task>)
                .put(resource::update::<Task>)
                .delete(resource::delete::<Task>),
        )
        .route("/tarefas/{id}/marcar_concluida/", post(tasks::mark_completed))
        .route("/tarefas/{id}/atribuir_usuario/", post(tasks::assign_user))
        .route("/tarefas/{id}/remover_usuario/", post(tasks::unassign_user))
        .route("/tarefas/{id}/mudar_status/", post(tasks::change_status))
}
