// ABOUTME: Append-only progress log table for weight entries and photo references
// ABOUTME: Rows are never updated or deleted

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{now_rfc3339, Database};
use crate::constants::progress;
use crate::errors::{AppError, AppResult};

/// Kind of progress entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Weight,
    Photo,
}

impl ProgressKind {
    /// Stored label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weight => progress::WEIGHT,
            Self::Photo => progress::PHOTO,
        }
    }
}

impl fmt::Display for ProgressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            progress::WEIGHT => Ok(Self::Weight),
            progress::PHOTO => Ok(Self::Photo),
            other => Err(AppError::database(format!(
                "Unknown progress log type: {other}"
            ))),
        }
    }
}

/// One progress log row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressLog {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ProgressKind,
    /// Kilograms, set for weight entries
    pub weight: Option<f64>,
    /// Public object URL, set for photo entries
    pub photo_url: Option<String>,
    /// RFC 3339 date the entry refers to
    pub date: String,
    pub created_at: String,
}

impl ProgressLog {
    /// New weight entry; `date` defaults to now
    #[must_use]
    pub fn weight(user_id: &str, weight: f64, date: Option<String>) -> Self {
        Self::new(user_id, ProgressKind::Weight, Some(weight), None, date)
    }

    /// New photo reference entry dated now
    #[must_use]
    pub fn photo(user_id: &str, photo_url: String) -> Self {
        Self::new(user_id, ProgressKind::Photo, None, Some(photo_url), None)
    }

    fn new(
        user_id: &str,
        kind: ProgressKind,
        weight: Option<f64>,
        photo_url: Option<String>,
        date: Option<String>,
    ) -> Self {
        let created_at = now_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_owned(),
            kind,
            weight,
            photo_url,
            date: date.unwrap_or_else(|| created_at.clone()),
            created_at,
        }
    }
}

impl Database {
    pub(super) async fn migrate_progress(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS progress_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('weight', 'photo')),
                weight REAL,
                photo_url TEXT,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_progress_logs_user ON progress_logs(user_id, date)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Append a progress log row
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write is rejected
    pub async fn insert_progress_log(&self, log: &ProgressLog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO progress_logs (id, user_id, type, weight, photo_url, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&log.id)
        .bind(&log.user_id)
        .bind(log.kind.as_str())
        .bind(log.weight)
        .bind(&log.photo_url)
        .bind(&log.date)
        .bind(&log.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Progress history for an identity, oldest first
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the read fails
    pub async fn list_progress_logs(&self, user_id: &str) -> AppResult<Vec<ProgressLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, type, weight, photo_url, date, created_at
            FROM progress_logs WHERE user_id = $1
            ORDER BY date, created_at
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_log).collect()
    }
}

fn row_to_log(row: &SqliteRow) -> AppResult<ProgressLog> {
    let kind: String = row.try_get("type")?;
    Ok(ProgressLog {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: kind.parse()?,
        weight: row.try_get("weight")?,
        photo_url: row.try_get("photo_url")?,
        date: row.try_get("date")?,
        created_at: row.try_get("created_at")?,
    })
}
