// ABOUTME: Core types for the NutriStrong plan service
// ABOUTME: Foundation crate with error handling and the profile/plan domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # NutriStrong Core
//!
//! Foundation crate providing the types shared by the server, the CLI and the
//! integration tests. It changes rarely, which keeps the workspace's incremental
//! builds cheap.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: `Profile`, `ComprehensivePlan` and the well-known Fallback Plan

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Profile and plan domain models
pub mod models;
