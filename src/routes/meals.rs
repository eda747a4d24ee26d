// ABOUTME: Meal routes: POST /meals/save and GET /meals/:day
// ABOUTME: Identity-scoped upsert and lookup of an opaque meals document per day label

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::Value;

use super::{ApiJson, ApiResponse};
use crate::database::MealPlanRecord;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Body of POST /meals/save
#[derive(Debug, Deserialize)]
pub struct SaveMealRequest {
    /// Day label, e.g. "Monday" or an ISO date
    pub day: String,
    #[serde(default)]
    pub meals: Value,
}

/// Meal routes handler
pub struct MealRoutes;

impl MealRoutes {
    /// Create all meal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/meals/save", post(Self::handle_save))
            .route("/meals/:day", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle POST /meals/save
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ApiJson(request): ApiJson<SaveMealRequest>,
    ) -> Result<ApiResponse<MealPlanRecord>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let record = resources
            .plans
            .save_meal(&identity, &request.day, &request.meals)
            .await?;
        Ok(ApiResponse::ok(record))
    }

    /// Handle GET /meals/:day
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(day): Path<String>,
    ) -> Result<ApiResponse<MealPlanRecord>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let record = resources.plans.get_meal(&identity, &day).await?;
        Ok(ApiResponse::ok(record))
    }
}
