// ABOUTME: Domain service layer between the HTTP routes and storage/generation
// ABOUTME: Exposes the PlanService boundary keyed by authenticated identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers stay thin: they extract and validate input, call a service
//! operation, and wrap the result in the response envelope.

/// Plan generation, profile+plan persistence, meals, workouts and progress logs
pub mod plan_service;

pub use plan_service::{PhotoUpload, PlanService};
