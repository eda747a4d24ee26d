// ABOUTME: Profile routes: GET /profile/me and POST /profile/save-plan
// ABOUTME: Both require a bearer token; the body accepts lenient profile fields plus plan_json

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use super::{ApiJson, ApiResponse};
use crate::database::ProfileWithPlan;
use crate::errors::AppError;
use crate::models::{ComprehensivePlan, ProfileInput};
use crate::resources::ServerResources;

/// Body of POST /profile/save-plan
#[derive(Debug, Deserialize)]
pub struct SavePlanRequest {
    /// Profile fields, all optional and defaulted
    #[serde(flatten)]
    pub profile: ProfileInput,
    /// Plan to store with the profile; `null` or absent stores none
    #[serde(default)]
    pub plan_json: Option<ComprehensivePlan>,
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/profile/me", get(Self::handle_me))
            .route("/profile/save-plan", post(Self::handle_save_plan))
            .with_state(resources)
    }

    /// Handle GET /profile/me
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<ApiResponse<ProfileWithPlan>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let profile = resources.plans.fetch_profile(&identity).await?;
        Ok(ApiResponse::ok(profile))
    }

    /// Handle POST /profile/save-plan
    async fn handle_save_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ApiJson(request): ApiJson<SavePlanRequest>,
    ) -> Result<ApiResponse<ProfileWithPlan>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let profile = request.profile.into_profile()?;
        let saved = resources
            .plans
            .save_plan(&identity, &profile, request.plan_json)
            .await?;
        Ok(ApiResponse::ok(saved))
    }
}
