// ABOUTME: Environment configuration for the plan service
// ABOUTME: Parses listen address, database, generative backend, identity and photo storage settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use std::env;
use std::fmt::{self, Debug, Display, Formatter};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{auth, database, network, plans, storage};
use crate::llm::GEMINI_DEFAULT_MODEL;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for anything other than a `sqlite:` URL
    pub fn parse_url(s: &str) -> Result<Self> {
        let Some(rest) = s.strip_prefix("sqlite:") else {
            bail!("Unsupported DATABASE_URL '{s}': only sqlite: URLs are supported");
        };
        let path = rest.trim_start_matches("//");
        if path.is_empty() || path == ":memory:" {
            Ok(Self::Memory)
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(path),
            })
        }
    }

    /// Connection string understood by sqlx
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Whether this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

/// Identity provider backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityBackend {
    /// Supabase-compatible (GoTrue) HTTP identity service
    Supabase,
    /// Users table with bcrypt hashes and locally signed tokens
    Local,
}

impl FromStr for IdentityBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(Self::Supabase),
            "local" => Ok(Self::Local),
            other => bail!("Invalid IDENTITY_PROVIDER '{other}': expected supabase or local"),
        }
    }
}

/// Object store backend for progress photos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Supabase storage REST API
    Supabase,
    /// Local filesystem directory
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(Self::Supabase),
            "local" => Ok(Self::Local),
            other => bail!("Invalid PHOTO_STORAGE '{other}': expected supabase or local"),
        }
    }
}

/// Supabase project endpoint and privileged key
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Service role key sent as `apikey` and bearer
    pub service_role_key: String,
}

impl Debug for SupabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_role_key", &"[REDACTED]")
            .finish()
    }
}

/// Generative backend settings
#[derive(Clone)]
pub struct LlmConfig {
    /// API key; when absent every generation degrades to the Fallback Plan
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Upper bound on one generation call
    pub timeout: Duration,
}

impl Debug for LlmConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmConfig {
    /// Read the generative backend settings shared by the server and the CLI
    ///
    /// # Errors
    ///
    /// Returns an error if `PLAN_GENERATION_TIMEOUT_SECS` does not parse or is
    /// out of range
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            model: env_var_or("GEMINI_MODEL", GEMINI_DEFAULT_MODEL),
            timeout: Duration::from_secs(parse_env_in_range(
                "PLAN_GENERATION_TIMEOUT_SECS",
                plans::DEFAULT_GENERATION_TIMEOUT_SECS,
                1..=plans::MAX_GENERATION_TIMEOUT_SECS,
            )?),
        })
    }
}

/// Identity provider settings
#[derive(Clone)]
pub struct IdentityConfig {
    /// Which provider verifies bearer tokens
    pub backend: IdentityBackend,
    /// Local provider signing secret; random per process when absent
    pub jwt_secret: Option<String>,
    /// Local provider token lifetime
    pub jwt_expiry_hours: i64,
}

impl Debug for IdentityConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("backend", &self.backend)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// Progress photo storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Which object store receives uploads
    pub backend: StorageBackend,
    /// Bucket name
    pub bucket: String,
    /// Root directory of the local store
    pub local_dir: PathBuf,
    /// Base URL under which the local store's files are served
    pub public_base_url: String,
    /// Multipart upload size limit
    pub max_photo_bytes: usize,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Profile, plan and log store
    pub database_url: DatabaseUrl,
    /// Generative backend
    pub llm: LlmConfig,
    /// Identity provider
    pub identity: IdentityConfig,
    /// Supabase endpoint, when configured
    pub supabase: Option<SupabaseConfig>,
    /// Progress photo storage
    pub storage: StorageConfig,
    /// Allowed CORS origins (`*` for any)
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a numeric value does not parse, a backend name is
    /// unknown, or a Supabase backend is selected without `SUPABASE_URL` and
    /// `SUPABASE_SERVICE_ROLE_KEY`.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        let http_port: u16 = match non_empty("HTTP_PORT").or_else(|| non_empty("PORT")) {
            Some(port) => port.parse().context("Invalid HTTP_PORT value")?,
            None => network::DEFAULT_HTTP_PORT,
        };

        let supabase = match (non_empty("SUPABASE_URL"), non_empty("SUPABASE_SERVICE_ROLE_KEY")) {
            (Some(url), Some(service_role_key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_owned(),
                service_role_key,
            }),
            _ => None,
        };
        let default_backend = if supabase.is_some() { "supabase" } else { "local" };

        let identity = IdentityConfig {
            backend: env_var_or("IDENTITY_PROVIDER", default_backend).parse()?,
            jwt_secret: non_empty("JWT_SECRET"),
            jwt_expiry_hours: parse_env_in_range(
                "JWT_EXPIRY_HOURS",
                auth::DEFAULT_JWT_EXPIRY_HOURS,
                1..=auth::MAX_JWT_EXPIRY_HOURS,
            )?,
        };

        let storage = StorageConfig {
            backend: env_var_or("PHOTO_STORAGE", default_backend).parse()?,
            bucket: env_var_or("PHOTO_BUCKET", storage::DEFAULT_PHOTO_BUCKET),
            local_dir: PathBuf::from(env_var_or(
                "LOCAL_PHOTO_DIR",
                storage::DEFAULT_LOCAL_PHOTO_DIR,
            )),
            public_base_url: env_var_or(
                "PUBLIC_BASE_URL",
                &format!(
                    "http://localhost:{http_port}{}",
                    storage::LOCAL_PHOTO_ROUTE
                ),
            )
            .trim_end_matches('/')
            .to_owned(),
            max_photo_bytes: parse_env("MAX_PHOTO_BYTES", storage::DEFAULT_MAX_PHOTO_BYTES)?,
        };

        if supabase.is_none()
            && (identity.backend == IdentityBackend::Supabase
                || storage.backend == StorageBackend::Supabase)
        {
            bail!("SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY are required for the supabase backend");
        }

        let config = Self {
            host: env_var_or("HOST", network::DEFAULT_HOST),
            http_port,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database_url: DatabaseUrl::parse_url(&env_var_or(
                "DATABASE_URL",
                database::DEFAULT_DATABASE_URL,
            ))?,
            llm: LlmConfig::from_env()?,
            identity,
            supabase,
            storage,
            cors_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
        };

        info!(
            port = config.http_port,
            identity = ?config.identity.backend,
            photos = ?config.storage.backend,
            llm_configured = config.llm.api_key.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    non_empty(key).unwrap_or_else(|| default.to_owned())
}

/// Environment variable, treating blank values as unset
fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a numeric environment variable, defaulting when unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    non_empty(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .with_context(|| format!("Invalid {key} value '{raw}'"))
    })
}

/// Parse a numeric environment variable that must fall inside `range`
fn parse_env_in_range<T>(key: &str, default: T, range: RangeInclusive<T>) -> Result<T>
where
    T: FromStr + PartialOrd + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = parse_env(key, default)?;
    if !range.contains(&value) {
        bail!(
            "{key} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        );
    }
    Ok(value)
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
