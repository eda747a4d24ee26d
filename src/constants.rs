// ABOUTME: Service-wide constants: defaults, limits and well-known names
// ABOUTME: Grouped by concern so configuration and handlers share one source of truth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded defaults. Environment overrides are read by
//! [`crate::config::ServerConfig::from_env`], never directly from here.

/// Service identity
pub mod service {
    /// Service name used in logs and health responses
    pub const SERVICE_NAME: &str = "nutristrong-server";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Network defaults
pub mod network {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 3001;

    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Prefix under which every API router is nested
    pub const API_PREFIX: &str = "/api";

    /// Upper bound for non-generation requests
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Timeout for identity provider and object store calls
    pub const EXTERNAL_CALL_TIMEOUT_SECS: u64 = 15;
}

/// Plan generation
pub mod plans {
    /// Default upper bound on one generative backend call
    pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

    /// Largest accepted generation timeout
    pub const MAX_GENERATION_TIMEOUT_SECS: u64 = 600;

    /// Response header reporting whether the plan was generated or is the fallback
    pub const PLAN_SOURCE_HEADER: &str = "x-plan-source";
}

/// Authentication
pub mod auth {
    /// Minimum password length accepted at registration
    pub const MIN_PASSWORD_LENGTH: usize = 6;

    /// Audience claim carried by identity tokens
    pub const TOKEN_AUDIENCE: &str = "authenticated";

    /// Default token lifetime for the local identity provider
    pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

    /// Longest accepted token lifetime (one year)
    pub const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365;

    /// Bcrypt cost for password hashes
    pub const BCRYPT_COST: u32 = 12;
}

/// Progress photo storage
pub mod storage {
    /// Default bucket for progress photos
    pub const DEFAULT_PHOTO_BUCKET: &str = "progress-photos";

    /// Default directory for the local object store
    pub const DEFAULT_LOCAL_PHOTO_DIR: &str = "./data/photos";

    /// Default multipart upload limit (10 MiB)
    pub const DEFAULT_MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

    /// Multipart field that carries the photo
    pub const PHOTO_FIELD: &str = "file";

    /// Route under which the local object store's files are served
    pub const LOCAL_PHOTO_ROUTE: &str = "/photos";

    /// Longest sanitized filename kept in an object key
    pub const MAX_FILENAME_CHARS: usize = 120;
}

/// Persistence
pub mod database {
    /// Default database URL
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/nutristrong.db";

    /// Pool size for file-backed databases
    pub const MAX_CONNECTIONS: u32 = 5;
}

/// Progress log entry kinds
pub mod progress {
    /// Weight measurement entry
    pub const WEIGHT: &str = "weight";

    /// Progress photo entry
    pub const PHOTO: &str = "photo";
}
