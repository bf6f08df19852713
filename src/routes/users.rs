use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::UserProfile;
use crate::routes::resource::Resource;
use crate::validation;

#[derive(Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: Option<String>,
}

fn validate_profile(
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), AppError> {
    validation::username(username)?;
    validation::email(email)?;
    validation::max_chars("first_name", first_name, 150)?;
    validation::max_chars("last_name", last_name, 150)
}

fn duplicate_username(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::BadRequest("A user with that username already exists.".to_string())
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl Resource for UserProfile {
    type Create = CreateUser;
    type Update = UpdateUser;

    const NAME: &'static str = "User";
    const ANONYMOUS_CREATE: bool = true;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn list(pool: &PgPool) -> Result<Vec<Self>, AppError> {
        Ok(db::users::list_profiles(pool).await?)
    }

    async fn retrieve(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        Ok(db::users::find_profile(pool, id).await?)
    }

    async fn create(
        pool: &PgPool,
        _caller: Option<&AuthUser>,
        req: CreateUser,
    ) -> Result<Self, AppError> {
        validate_profile(&req.username, &req.email, &req.first_name, &req.last_name)?;
        if req.password.is_empty() {
            return Err(AppError::BadRequest("password may not be blank.".to_string()));
        }

        let pw_hash = password::hash(&req.password)?;

        let user = db::users::create(
            pool,
            &req.username,
            &req.email,
            &pw_hash,
            &req.first_name,
            &req.last_name,
        )
        .await
        .map_err(duplicate_username)?;

        Ok(user.into())
    }

    async fn update(pool: &PgPool, id: Uuid, req: UpdateUser) -> Result<Option<Self>, AppError> {
        validate_profile(&req.username, &req.email, &req.first_name, &req.last_name)?;

        let pw_hash = match req.password.as_deref() {
            Some("") => {
                return Err(AppError::BadRequest("password may not be blank.".to_string()));
            }
            Some(pw) => Some(password::hash(pw)?),
            None => None,
        };

        db::users::update(
            pool,
            id,
            &req.username,
            &req.email,
            &req.first_name,
            &req.last_name,
            pw_hash.as_deref(),
        )
        .await
        .map_err(duplicate_username)
    }

    async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        Ok(db::users::delete(pool, id).await?)
    }
}
