pub mod auth_tokens;
pub mod projects;
pub mod tasks;
pub mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Open a pool and bring the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
