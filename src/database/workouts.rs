// ABOUTME: Workout table operations keyed by identity and free-form day label
// ABOUTME: Exercises are stored as a JSON array; the week view lists every stored day

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{now_rfc3339, Database};
use crate::errors::{AppError, AppResult};

/// One stored workout day for an identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub user_id: String,
    pub day: String,
    /// Muscle group or "Rest"
    pub focus: String,
    pub exercises: Vec<Value>,
    pub updated_at: String,
}

impl Database {
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                user_id TEXT NOT NULL,
                day TEXT NOT NULL,
                focus TEXT NOT NULL,
                exercises TEXT NOT NULL DEFAULT '[]',
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, day)
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace the workout for one day
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write is rejected
    pub async fn upsert_workout(
        &self,
        user_id: &str,
        day: &str,
        focus: &str,
        exercises: &[Value],
    ) -> AppResult<WorkoutRecord> {
        let updated_at = now_rfc3339();
        sqlx::query(
            r"
            INSERT INTO workouts (user_id, day, focus, exercises, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(user_id, day) DO UPDATE SET
                focus = excluded.focus,
                exercises = excluded.exercises,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(day)
        .bind(focus)
        .bind(serde_json::to_string(exercises)?)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(WorkoutRecord {
            user_id: user_id.to_owned(),
            day: day.to_owned(),
            focus: focus.to_owned(),
            exercises: exercises.to_vec(),
            updated_at,
        })
    }

    /// List every stored workout day for an identity, in insertion order
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the read fails
    pub async fn list_workouts(&self, user_id: &str) -> AppResult<Vec<WorkoutRecord>> {
        let rows = sqlx::query(
            r"
            SELECT user_id, day, focus, exercises, updated_at
            FROM workouts WHERE user_id = $1
            ORDER BY rowid
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_workout).collect()
    }
}

fn row_to_workout(row: &SqliteRow) -> AppResult<WorkoutRecord> {
    let exercises: String = row.try_get("exercises")?;
    Ok(WorkoutRecord {
        user_id: row.try_get("user_id")?,
        day: row.try_get("day")?,
        focus: row.try_get("focus")?,
        exercises: serde_json::from_str(&exercises)
            .map_err(|e| AppError::database(format!("Stored exercises are unreadable: {e}")))?,
        updated_at: row.try_get("updated_at")?,
    })
}
