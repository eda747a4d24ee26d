// ABOUTME: Plan generation route: POST /ai/generate-plan
// ABOUTME: Always answers 200 with a plan; the x-plan-source header reports degradation

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use super::{ApiJson, ApiResponse};
use crate::constants::plans::PLAN_SOURCE_HEADER;
use crate::errors::AppError;
use crate::models::ProfileInput;
use crate::resources::ServerResources;

/// Plan generation routes handler
pub struct AiRoutes;

impl AiRoutes {
    /// Create all plan generation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ai/generate-plan", post(Self::handle_generate_plan))
            .with_state(resources)
    }

    /// Handle POST /ai/generate-plan
    ///
    /// No authentication: onboarding generates a plan before an account exists.
    async fn handle_generate_plan(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(input): ApiJson<ProfileInput>,
    ) -> Result<Response, AppError> {
        let profile = input.into_profile()?;
        let generation = resources.plans.generate_with_outcome(&profile).await;

        let mut response = ApiResponse::ok(generation.plan).into_response();
        response.headers_mut().insert(
            PLAN_SOURCE_HEADER,
            HeaderValue::from_static(generation.outcome.source_label()),
        );
        Ok(response)
    }
}
