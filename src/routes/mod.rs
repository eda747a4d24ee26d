// ABOUTME: HTTP route organization for the plan service API
// ABOUTME: Response envelope, JSON extractor and the /api router assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the NutriStrong API
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to [`crate::services::PlanService`] or the identity provider.
//! Successes are wrapped as `{success: true, data}`; failures are rendered by
//! `AppError` as `{success: false, error}`.

/// Plan generation routes
pub mod ai;
/// Registration, login and current identity
pub mod auth;
/// Liveness and readiness probes
pub mod health;
/// Per-day meal storage
pub mod meals;
/// Weight and photo progress logs
pub mod progress;
/// Profile and plan persistence
pub mod profile;
/// Per-day workout storage
pub mod workouts;

pub use ai::AiRoutes;
pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use meals::MealRoutes;
pub use profile::ProfileRoutes;
pub use progress::ProgressRoutes;
pub use workouts::WorkoutRoutes;

use std::sync::Arc;

use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Success envelope returned by every API endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap `data` in a success envelope
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// JSON body extractor whose rejections render as `InvalidInput`
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Every `/api` route, without transport layers
pub fn api_routes(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(AiRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(ProfileRoutes::routes(resources.clone()))
        .merge(MealRoutes::routes(resources.clone()))
        .merge(WorkoutRoutes::routes(resources.clone()))
        .merge(ProgressRoutes::routes(resources.clone()))
}
