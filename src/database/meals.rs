// ABOUTME: Meal plan table operations keyed by identity and free-form day label
// ABOUTME: The meals payload is stored as an opaque JSON document

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{now_rfc3339, Database};
use crate::errors::{AppError, AppResult};

/// One stored day of meals for an identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRecord {
    pub user_id: String,
    /// Free-form day label, not validated against a calendar
    pub day: String,
    /// Opaque meals document as sent by the client
    pub meals: Value,
    pub updated_at: String,
}

impl Database {
    pub(super) async fn migrate_meals(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS meal_plans (
                user_id TEXT NOT NULL,
                day TEXT NOT NULL,
                meals TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, day)
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace the meals for one day
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write is rejected
    pub async fn upsert_meal(
        &self,
        user_id: &str,
        day: &str,
        meals: &Value,
    ) -> AppResult<MealPlanRecord> {
        let updated_at = now_rfc3339();
        sqlx::query(
            r"
            INSERT INTO meal_plans (user_id, day, meals, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(user_id, day) DO UPDATE SET
                meals = excluded.meals,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(day)
        .bind(serde_json::to_string(meals)?)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(MealPlanRecord {
            user_id: user_id.to_owned(),
            day: day.to_owned(),
            meals: meals.clone(),
            updated_at,
        })
    }

    /// Fetch the meals stored for one day
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the read fails or the stored document is unreadable
    pub async fn get_meal(&self, user_id: &str, day: &str) -> AppResult<Option<MealPlanRecord>> {
        let row = sqlx::query(
            "SELECT user_id, day, meals, updated_at FROM meal_plans WHERE user_id = $1 AND day = $2",
        )
        .bind(user_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_meal).transpose()
    }
}

fn row_to_meal(row: &SqliteRow) -> AppResult<MealPlanRecord> {
    let meals: String = row.try_get("meals")?;
    Ok(MealPlanRecord {
        user_id: row.try_get("user_id")?,
        day: row.try_get("day")?,
        meals: serde_json::from_str(&meals)
            .map_err(|e| AppError::database(format!("Stored meals are unreadable: {e}")))?,
        updated_at: row.try_get("updated_at")?,
    })
}
