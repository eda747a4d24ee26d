// ABOUTME: Main library entry point for the NutriStrong plan service
// ABOUTME: Generates weekly diet and training plans and persists them per authenticated identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # NutriStrong Server
//!
//! An HTTP service that turns a user's biometric profile into a structured
//! weekly meal and workout plan using a generative backend, and stores the
//! profile, plan, daily meals, workouts and progress logs per identity.
//!
//! ## Architecture
//!
//! - **Plans**: prompt builder, plan normalizer and the never-failing generator
//! - **Services**: the `PlanService` boundary used by every route
//! - **Auth / Middleware**: identity providers and the bearer token gate
//! - **Database / Storage**: `SQLite` persistence and progress photo storage
//! - **Routes / Server**: axum routers nested under `/api`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nutristrong_server::llm::GeminiProvider;
//! use nutristrong_server::models::Profile;
//! use nutristrong_server::plans::PlanGenerator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let generator = PlanGenerator::new(Arc::new(GeminiProvider::new("api-key")));
//!     let plan = generator.generate(&Profile::default()).await;
//!     println!("{} kcal/day", plan.daily_calories);
//! }
//! ```

/// Identity providers and session types
pub mod auth;
/// Environment-driven configuration
pub mod config;
/// Application constants and defaults
pub mod constants;
/// `SQLite` persistence for profiles, plans and logs
pub mod database;
/// Onboarding draft storage
pub mod draft;
/// Unified error handling re-exported from the core crate
pub mod errors;
/// Generative backend abstraction and the Gemini provider
pub mod llm;
/// Structured logging setup
pub mod logging;
/// HTTP middleware: access gate, CORS and request tracing
pub mod middleware;
/// Profile and plan models re-exported from the core crate
pub mod models;
/// Prompt builder, plan normalizer and plan generator
pub mod plans;
/// Dependency container for route handlers
pub mod resources;
/// HTTP route handlers
pub mod routes;
/// Router assembly and server startup
pub mod server;
/// Domain services
pub mod services;
/// Progress photo object storage
pub mod storage;
