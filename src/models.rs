// ABOUTME: Profile and plan domain models re-exported from nutristrong-core
// ABOUTME: Includes the lenient profile input and the well-known Fallback Plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use nutristrong_core::models::*;
