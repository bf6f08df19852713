use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::models::UserProfile;

/// A project together with its owner's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub owner: UserProfile,
}

impl Project {
    /// Project columns are read as `{prefix}id`, `{prefix}name`, ... and the
    /// owner as `{prefix}owner_id`, `{prefix}owner_username`, ...
    pub(crate) fn from_prefixed_row(row: &PgRow, prefix: &str) -> Result<Self, sqlx::Error> {
        let col = |name: &str| format!("{prefix}{name}");
        Ok(Project {
            id: row.try_get(col("id").as_str())?,
            name: row.try_get(col("name").as_str())?,
            description: row.try_get(col("description").as_str())?,
            created_at: row.try_get(col("created_at").as_str())?,
            owner: UserProfile::from_prefixed_row(row, &col("owner_"))?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Project {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Project::from_prefixed_row(row, "")
    }
}

/// Task counts of a single project, split by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub in_progress: i64,
}
