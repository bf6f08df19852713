use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{User, UserProfile};

const PROFILE_COLUMNS: &str = "id, username, email, first_name, last_name";

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    username: &str,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash, first_name, last_name)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(executor)
    .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_profile(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_profiles(pool: &PgPool) -> Result<Vec<UserProfile>, sqlx::Error> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM users ORDER BY username");
    sqlx::query_as::<_, UserProfile>(&sql).fetch_all(pool).await
}

/// Replace the profile fields. A `None` password hash keeps the current one.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    password_hash: Option<&str>,
) -> Result<Option<UserProfile>, sqlx::Error> {
    let sql = format!(
        "UPDATE users
         SET username = $2, email = $3, first_name = $4, last_name = $5,
             password_hash = COALESCE($6, password_hash)
         WHERE id = $1
         RETURNING {PROFILE_COLUMNS}"
    );
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(password_hash)
        .fetch_optional(pool)
        .await
}

/// Owned projects (and their tasks) and the user's token go with the row;
/// tasks assigned to the user are left unassigned.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
