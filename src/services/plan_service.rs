// ABOUTME: The Plan Service boundary: generate-or-fallback plus identity-scoped persistence
// ABOUTME: Generation never fails; persistence and lookup failures are surfaced verbatim

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::auth::Identity;
use crate::database::mappers::{profile_to_record, record_to_profile};
use crate::database::{Database, MealPlanRecord, ProfileWithPlan, ProgressLog, WorkoutRecord};
use crate::errors::{AppError, AppResult};
use crate::models::{ComprehensivePlan, Profile};
use crate::plans::{PlanGeneration, PlanGenerator};
use crate::storage::{photo_key, ObjectStore};

/// Result of a progress photo upload
#[derive(Debug, Clone, Serialize)]
pub struct PhotoUpload {
    /// Public URL of the stored photo
    pub url: String,
}

/// Orchestrates generation and persistence for one deployment
#[derive(Clone)]
pub struct PlanService {
    generator: PlanGenerator,
    database: Database,
    photos: Arc<dyn ObjectStore>,
}

impl PlanService {
    /// Create the service from its injected collaborators
    #[must_use]
    pub fn new(generator: PlanGenerator, database: Database, photos: Arc<dyn ObjectStore>) -> Self {
        Self {
            generator,
            database,
            photos,
        }
    }

    /// Generate a plan for `profile`; degrades to the Fallback Plan, never errors
    pub async fn generate(&self, profile: &Profile) -> ComprehensivePlan {
        self.generator.generate(profile).await
    }

    /// Generate a plan and report whether it was degraded
    pub async fn generate_with_outcome(&self, profile: &Profile) -> PlanGeneration {
        self.generator.generate_with_outcome(profile).await
    }

    /// Upsert the combined profile+plan record for an identity
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the store rejects the write
    #[instrument(skip(self, profile, plan), fields(user_id = %identity.id))]
    pub async fn save_plan(
        &self,
        identity: &Identity,
        profile: &Profile,
        plan: Option<ComprehensivePlan>,
    ) -> AppResult<ProfileWithPlan> {
        let record = profile_to_record(&identity.id, profile, plan);
        let stored = self.database.upsert_profile(&record).await?;
        info!(has_plan = stored.plan_json.is_some(), "Profile saved");
        record_to_profile(stored)
    }

    /// Fetch the profile and latest plan for an identity
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the identity has never saved a profile
    pub async fn fetch_profile(&self, identity: &Identity) -> AppResult<ProfileWithPlan> {
        let record = self
            .database
            .get_profile(&identity.id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not found"))?;
        record_to_profile(record)
    }

    /// Upsert the meals for one day
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the store rejects the write
    pub async fn save_meal(
        &self,
        identity: &Identity,
        day: &str,
        meals: &Value,
    ) -> AppResult<MealPlanRecord> {
        self.database.upsert_meal(&identity.id, day, meals).await
    }

    /// Meals stored for one day
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if nothing is stored for that day
    pub async fn get_meal(&self, identity: &Identity, day: &str) -> AppResult<MealPlanRecord> {
        self.database
            .get_meal(&identity.id, day)
            .await?
            .ok_or_else(|| AppError::not_found("Meals not found for this day"))
    }

    /// Upsert the workout for one day
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the store rejects the write
    pub async fn save_workout(
        &self,
        identity: &Identity,
        day: &str,
        focus: &str,
        exercises: &[Value],
    ) -> AppResult<WorkoutRecord> {
        self.database
            .upsert_workout(&identity.id, day, focus, exercises)
            .await
    }

    /// Every stored workout day for an identity
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the read fails
    pub async fn get_week_workouts(&self, identity: &Identity) -> AppResult<Vec<WorkoutRecord>> {
        self.database.list_workouts(&identity.id).await
    }

    /// Append a weight entry; `date` defaults to now
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-finite or non-positive weight, or
    /// `DatabaseError` if the store rejects the write
    pub async fn log_weight(
        &self,
        identity: &Identity,
        weight: f64,
        date: Option<String>,
    ) -> AppResult<ProgressLog> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "Invalid weight {weight}: must be a positive number"
            )));
        }
        let date = date.filter(|d| !d.trim().is_empty());
        let log = ProgressLog::weight(&identity.id, weight, date);
        self.database.insert_progress_log(&log).await?;
        Ok(log)
    }

    /// Store a progress photo externally and append a reference row
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty file, the object store's error if
    /// the upload fails, or `DatabaseError` if the reference row is rejected
    #[instrument(skip(self, bytes), fields(user_id = %identity.id, size = bytes.len()))]
    pub async fn upload_progress_photo(
        &self,
        identity: &Identity,
        bytes: Bytes,
        filename: &str,
        content_type: &str,
    ) -> AppResult<PhotoUpload> {
        if bytes.is_empty() {
            return Err(AppError::invalid_input("No file uploaded"));
        }

        let key = photo_key(&identity.id, filename);
        let url = self.photos.put(&key, bytes, content_type).await?;

        let log = ProgressLog::photo(&identity.id, url.clone());
        self.database.insert_progress_log(&log).await?;
        info!(store = self.photos.name(), %key, "Progress photo stored");

        Ok(PhotoUpload { url })
    }

    /// Progress history for an identity
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the read fails
    pub async fn progress_history(&self, identity: &Identity) -> AppResult<Vec<ProgressLog>> {
        self.database.list_progress_logs(&identity.id).await
    }
}
