// ABOUTME: Progress routes: weight logging, progress photo upload and history
// ABOUTME: Photos arrive as multipart form data in the "file" field and are stored externally

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use super::{ApiJson, ApiResponse};
use crate::constants::storage::PHOTO_FIELD;
use crate::database::ProgressLog;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::PhotoUpload;

/// Slack for multipart boundaries and part headers on top of the file limit
const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

/// Body of POST /progress/weight
#[derive(Debug, Deserialize)]
pub struct LogWeightRequest {
    /// Weight in kilograms
    pub weight: f64,
    /// RFC 3339 date; defaults to now
    #[serde(default)]
    pub date: Option<String>,
}

/// Progress routes handler
pub struct ProgressRoutes;

impl ProgressRoutes {
    /// Create all progress routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let body_limit = resources
            .max_photo_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES);

        Router::new()
            .route("/progress/weight", post(Self::handle_weight))
            .route(
                "/progress/photo",
                post(Self::handle_photo).layer(DefaultBodyLimit::max(body_limit)),
            )
            .route("/progress/history", get(Self::handle_history))
            .with_state(resources)
    }

    /// Handle POST /progress/weight
    async fn handle_weight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ApiJson(request): ApiJson<LogWeightRequest>,
    ) -> Result<ApiResponse<ProgressLog>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let log = resources
            .plans
            .log_weight(&identity, request.weight, request.date)
            .await?;
        Ok(ApiResponse::ok(log))
    }

    /// Handle POST /progress/photo
    async fn handle_photo(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<ApiResponse<PhotoUpload>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let mut multipart = multipart?;

        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(PHOTO_FIELD) {
                continue;
            }
            let filename = field.file_name().unwrap_or("upload").to_owned();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field.bytes().await?;

            let upload = resources
                .plans
                .upload_progress_photo(&identity, bytes, &filename, &content_type)
                .await?;
            return Ok(ApiResponse::ok(upload));
        }

        Err(AppError::invalid_input("No file uploaded"))
    }

    /// Handle GET /progress/history
    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<ApiResponse<Vec<ProgressLog>>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        let history = resources.plans.progress_history(&identity).await?;
        Ok(ApiResponse::ok(history))
    }
}
