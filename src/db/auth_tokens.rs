use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AuthToken, User};

/// Return the user's token, storing `candidate_key` first if the user has
/// none yet. At most one token exists per user.
pub async fn get_or_create(
    pool: &PgPool,
    user_id: Uuid,
    candidate_key: &str,
) -> Result<AuthToken, sqlx::Error> {
    sqlx::query(
        "INSERT INTO auth_tokens (key, user_id) VALUES ($1, $2)
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(candidate_key)
    .bind(user_id)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, AuthToken>("SELECT * FROM auth_tokens WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn find_user_by_key(pool: &PgPool, key: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT u.* FROM auth_tokens t JOIN users u ON u.id = t.user_id WHERE t.key = $1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await
}

pub async fn delete_by_key(pool: &PgPool, key: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM auth_tokens WHERE key = $1")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}
