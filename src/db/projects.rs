use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Project, ProjectProgress};

/// Columns of a project row `p` joined with its owner `o`.
const PROJECT_COLUMNS: &str = "p.id, p.name, p.description, p.created_at,
    o.id AS owner_id, o.username AS owner_username, o.email AS owner_email,
    o.first_name AS owner_first_name, o.last_name AS owner_last_name";

pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
    let sql = format!(
        "SELECT {PROJECT_COLUMNS}
         FROM projects p JOIN users o ON o.id = p.owner_id
         ORDER BY p.created_at, p.id"
    );
    sqlx::query_as::<_, Project>(&sql).fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    let sql = format!(
        "SELECT {PROJECT_COLUMNS}
         FROM projects p JOIN users o ON o.id = p.owner_id
         WHERE p.id = $1"
    );
    sqlx::query_as::<_, Project>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: &str,
    owner_id: Uuid,
) -> Result<Project, sqlx::Error> {
    let sql = format!(
        "WITH p AS (
             INSERT INTO projects (name, description, owner_id)
             VALUES ($1, $2, $3) RETURNING *
         )
         SELECT {PROJECT_COLUMNS} FROM p JOIN users o ON o.id = p.owner_id"
    );
    sqlx::query_as::<_, Project>(&sql)
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_one(pool)
        .await
}

/// A `None` owner keeps the current one.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    description: &str,
    owner_id: Option<Uuid>,
) -> Result<Option<Project>, sqlx::Error> {
    let sql = format!(
        "WITH p AS (
             UPDATE projects
             SET name = $2, description = $3, owner_id = COALESCE($4, owner_id)
             WHERE id = $1 RETURNING *
         )
         SELECT {PROJECT_COLUMNS} FROM p JOIN users o ON o.id = p.owner_id"
    );
    sqlx::query_as::<_, Project>(&sql)
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
}

/// Returns false when the project does not exist.
pub async fn set_owner(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE projects SET owner_id = $2 WHERE id = $1")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn progress(pool: &PgPool, id: Uuid) -> Result<ProjectProgress, sqlx::Error> {
    sqlx::query_as::<_, ProjectProgress>(
        "SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress
         FROM tasks WHERE project_id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Tasks of the project go with it.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
