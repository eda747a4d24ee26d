// ABOUTME: Workout routes: POST /workouts/save and GET /workouts/week
// ABOUTME: Identity-scoped upsert per day label and the full stored week

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::Value;

use super::{ApiJson, ApiResponse};
use crate::database::WorkoutRecord;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Body of POST /workouts/save
#[derive(Debug, Deserialize)]
pub struct SaveWorkoutRequest {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<Value>,
}

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/workouts/save", post(Self::handle_save))
            .route("/workouts/week", get(Self::handle_week))
            .with_state(resources)
    }

    /// Handle POST /workouts/save
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ApiJson(request): ApiJson<SaveWorkoutRequest>,
    ) -> Result<ApiResponse<WorkoutRecord>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let record = resources
            .plans
            .save_workout(&identity, &request.day, &request.focus, &request.exercises)
            .await?;
        Ok(ApiResponse::ok(record))
    }

    /// Handle GET /workouts/week
    async fn handle_week(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<ApiResponse<Vec<WorkoutRecord>>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let week = resources.plans.get_week_workouts(&identity).await?;
        Ok(ApiResponse::ok(week))
    }
}
