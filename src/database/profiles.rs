// ABOUTME: Profile table operations: upsert-by-identity and fetch of the profile+plan record
// ABOUTME: Rows use storage column names; Profile mapping lives in mappers.rs

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::ComprehensivePlan;

/// Profile and latest plan for one identity, in storage column names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    /// Identity id
    pub id: String,
    pub age: u32,
    pub gender: String,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub goal: String,
    pub activity_level: String,
    /// Dietary restrictions, one entry per comma-separated item
    pub diet_preferences: Vec<String>,
    /// Allergies, one entry per comma-separated item
    pub allergies: Vec<String>,
    /// Latest plan; replaces any earlier one
    pub plan_json: Option<ComprehensivePlan>,
    /// RFC 3339 time of the last write
    pub updated_at: String,
}

impl Database {
    pub(super) async fn migrate_profiles(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                age INTEGER NOT NULL,
                gender TEXT NOT NULL,
                height REAL NOT NULL,
                weight REAL NOT NULL,
                goal TEXT NOT NULL,
                activity_level TEXT NOT NULL,
                diet_preferences TEXT NOT NULL DEFAULT '[]',
                allergies TEXT NOT NULL DEFAULT '[]',
                plan_json TEXT,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace the profile+plan record for an identity
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write is rejected
    pub async fn upsert_profile(&self, record: &StoredProfile) -> AppResult<StoredProfile> {
        let plan_json = record
            .plan_json
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r"
            INSERT INTO profiles (
                id, age, gender, height, weight, goal, activity_level,
                diet_preferences, allergies, plan_json, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT(id) DO UPDATE SET
                age = excluded.age,
                gender = excluded.gender,
                height = excluded.height,
                weight = excluded.weight,
                goal = excluded.goal,
                activity_level = excluded.activity_level,
                diet_preferences = excluded.diet_preferences,
                allergies = excluded.allergies,
                plan_json = excluded.plan_json,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&record.id)
        .bind(i64::from(record.age))
        .bind(&record.gender)
        .bind(record.height)
        .bind(record.weight)
        .bind(&record.goal)
        .bind(&record.activity_level)
        .bind(serde_json::to_string(&record.diet_preferences)?)
        .bind(serde_json::to_string(&record.allergies)?)
        .bind(plan_json)
        .bind(&record.updated_at)
        .execute(&self.pool)
        .await?;

        self.get_profile(&record.id)
            .await?
            .ok_or_else(|| AppError::database("Profile row missing after upsert"))
    }

    /// Fetch the profile+plan record for an identity
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the read fails or the row is unreadable
    pub async fn get_profile(&self, id: &str) -> AppResult<Option<StoredProfile>> {
        let row = sqlx::query(
            r"
            SELECT id, age, gender, height, weight, goal, activity_level,
                   diet_preferences, allergies, plan_json, updated_at
            FROM profiles WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    fn row_to_profile(row: &SqliteRow) -> AppResult<StoredProfile> {
        let age: i64 = row.try_get("age")?;
        let diet_preferences: String = row.try_get("diet_preferences")?;
        let allergies: String = row.try_get("allergies")?;
        let plan_json: Option<String> = row.try_get("plan_json")?;

        Ok(StoredProfile {
            id: row.try_get("id")?,
            age: u32::try_from(age)
                .map_err(|_| AppError::database(format!("Stored age {age} out of range")))?,
            gender: row.try_get("gender")?,
            height: row.try_get("height")?,
            weight: row.try_get("weight")?,
            goal: row.try_get("goal")?,
            activity_level: row.try_get("activity_level")?,
            diet_preferences: serde_json::from_str(&diet_preferences)?,
            allergies: serde_json::from_str(&allergies)?,
            plan_json: plan_json.as_deref().map(serde_json::from_str).transpose()?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
