// ABOUTME: Configuration module for the plan service
// ABOUTME: Re-exports the environment-driven ServerConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment and server configuration
pub mod environment;

pub use environment::{
    DatabaseUrl, Environment, IdentityBackend, IdentityConfig, LlmConfig, ServerConfig,
    StorageBackend, StorageConfig, SupabaseConfig,
};
