use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Full user row, including the credential. Only used internally.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserProfile {
    /// Read a profile from a joined row whose user columns share `prefix`
    /// (`owner_id`, `owner_username`, ...).
    pub(crate) fn from_prefixed_row(row: &PgRow, prefix: &str) -> Result<Self, sqlx::Error> {
        let col = |name: &str| format!("{prefix}{name}");
        Ok(UserProfile {
            id: row.try_get(col("id").as_str())?,
            username: row.try_get(col("username").as_str())?,
            email: row.try_get(col("email").as_str())?,
            first_name: row.try_get(col("first_name").as_str())?,
            last_name: row.try_get(col("last_name").as_str())?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for UserProfile {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        UserProfile::from_prefixed_row(row, "")
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
