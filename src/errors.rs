// ABOUTME: Unified error handling re-exported from nutristrong-core
// ABOUTME: AppError, ErrorCode and AppResult with the HTTP envelope rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use nutristrong_core::errors::*;
