use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ProjectTaskCount, Task, TaskStatus};

/// Columns of a task row `t` joined with its project `p`, the project
/// owner `o` and the optional assignee `a`.
const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.created_at, t.completed_at,
    p.id AS project_id, p.name AS project_name, p.description AS project_description,
    p.created_at AS project_created_at,
    o.id AS project_owner_id, o.username AS project_owner_username,
    o.email AS project_owner_email, o.first_name AS project_owner_first_name,
    o.last_name AS project_owner_last_name,
    a.id AS assignee_id, a.username AS assignee_username, a.email AS assignee_email,
    a.first_name AS assignee_first_name, a.last_name AS assignee_last_name";

const TASK_JOINS: &str = "JOIN projects p ON p.id = t.project_id
    JOIN users o ON o.id = p.owner_id
    LEFT JOIN users a ON a.id = t.assignee_id";

pub async fn list(pool: &PgPool) -> Result<Vec<Task>, sqlx::Error> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks t {TASK_JOINS} ORDER BY t.created_at, t.id"
    );
    sqlx::query_as::<_, Task>(&sql).fetch_all(pool).await
}

pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks t {TASK_JOINS}
         WHERE t.project_id = $1
         ORDER BY t.created_at, t.id"
    );
    sqlx::query_as::<_, Task>(&sql)
        .bind(project_id)
        .fetch_all(pool)
        .await
}

pub async fn list_by_assignee(pool: &PgPool, user_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks t {TASK_JOINS}
         WHERE t.assignee_id = $1
         ORDER BY t.created_at, t.id"
    );
    sqlx::query_as::<_, Task>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks t {TASK_JOINS} WHERE t.id = $1");
    sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Creating a task directly as completed stamps its completion time.
pub async fn create(
    pool: &PgPool,
    title: &str,
    description: Option<&str>,
    status: TaskStatus,
    project_id: Uuid,
    assignee_id: Option<Uuid>,
) -> Result<Task, sqlx::Error> {
    let sql = format!(
        "WITH t AS (
             INSERT INTO tasks (title, description, status, completed_at, project_id, assignee_id)
             VALUES ($1, $2, $3, CASE WHEN $3 = 'completed'::task_status THEN now() END, $4, $5)
             RETURNING *
         )
         SELECT {TASK_COLUMNS} FROM t {TASK_JOINS}"
    );
    sqlx::query_as::<_, Task>(&sql)
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(project_id)
        .bind(assignee_id)
        .fetch_one(pool)
        .await
}

/// Optional fields left as `None` keep their current value. Moving the
/// task into `completed` stamps the completion time; leaving `completed`
/// does not clear it.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    description: Option<&str>,
    status: Option<TaskStatus>,
    project_id: Uuid,
    assignee_id: Option<Uuid>,
) -> Result<Option<Task>, sqlx::Error> {
    let sql = format!(
        "WITH t AS (
             UPDATE tasks
             SET title = $2,
                 description = COALESCE($3, description),
                 completed_at = CASE
                     WHEN $4 = 'completed'::task_status AND status <> 'completed'::task_status
                         THEN now()
                     ELSE completed_at
                 END,
                 status = COALESCE($4, status),
                 project_id = $5,
                 assignee_id = COALESCE($6, assignee_id)
             WHERE id = $1
             RETURNING *
         )
         SELECT {TASK_COLUMNS} FROM t {TASK_JOINS}"
    );
    sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(project_id)
        .bind(assignee_id)
        .fetch_optional(pool)
        .await
}

/// Sets the status, stamping `completed_at` when the new status is
/// `completed`. Any earlier completion time is kept otherwise.
/// Returns false when the task does not exist.
pub async fn set_status(pool: &PgPool, id: Uuid, status: TaskStatus) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE tasks
         SET status = $2,
             completed_at = CASE WHEN $2 = 'completed'::task_status THEN now() ELSE completed_at END
         WHERE id = $1",
    )
    .bind(id)
    .bind(status)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns false when the task does not exist. A missing user surfaces as
/// a foreign-key violation on `tasks_assignee_id_fkey`.
pub async fn set_assignee(
    pool: &PgPool,
    id: Uuid,
    assignee_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE tasks SET assignee_id = $2 WHERE id = $1")
        .bind(id)
        .bind(assignee_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Task totals grouped by project name, smallest first. Distinct projects
/// sharing a name are merged into one entry.
pub async fn count_by_project_name(pool: &PgPool) -> Result<Vec<ProjectTaskCount>, sqlx::Error> {
    sqlx::query_as::<_, ProjectTaskCount>(
        "SELECT p.name AS project_name, COUNT(t.id) AS count
         FROM tasks t JOIN projects p ON p.id = t.project_id
         GROUP BY p.name
         ORDER BY count, p.name",
    )
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
