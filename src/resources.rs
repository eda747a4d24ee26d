// ABOUTME: Dependency container shared by every route handler
// ABOUTME: Builds the database, generator, identity provider and object store from configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Every external collaborator is constructed once at startup and injected
//! here; handlers reach them through `State<Arc<ServerResources>>`. Tests
//! build a container directly with [`ServerResources::new`] and fakes.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::auth::{IdentityProvider, LocalIdentityProvider, SupabaseIdentityProvider};
use crate::config::{IdentityBackend, ServerConfig, StorageBackend, SupabaseConfig};
use crate::constants::network::EXTERNAL_CALL_TIMEOUT_SECS;
use crate::constants::storage::DEFAULT_MAX_PHOTO_BYTES;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::middleware::AccessGate;
use crate::plans::PlanGenerator;
use crate::services::PlanService;
use crate::storage::{LocalObjectStore, ObjectStore, SupabaseObjectStore};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    pub database: Database,
    pub plans: PlanService,
    pub identity: Arc<dyn IdentityProvider>,
    pub gate: AccessGate,
    /// Multipart upload limit for progress photos
    pub max_photo_bytes: usize,
}

impl ServerResources {
    /// Assemble resources from already-built collaborators
    #[must_use]
    pub fn new(
        database: Database,
        generator: PlanGenerator,
        identity: Arc<dyn IdentityProvider>,
        photos: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            plans: PlanService::new(generator, database.clone(), photos),
            gate: AccessGate::new(identity.clone()),
            database,
            identity,
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }

    /// Override the photo upload limit
    #[must_use]
    pub const fn with_max_photo_bytes(mut self, max_photo_bytes: usize) -> Self {
        self.max_photo_bytes = max_photo_bytes;
        self
    }

    /// Build every collaborator described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, an HTTP client
    /// cannot be built, or a Supabase backend is selected without settings
    pub async fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database_url).await?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(EXTERNAL_CALL_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        let generator = PlanGenerator::from_config(&config.llm)?;

        let identity: Arc<dyn IdentityProvider> = match config.identity.backend {
            IdentityBackend::Supabase => Arc::new(SupabaseIdentityProvider::new(
                http.clone(),
                Self::supabase(config)?,
            )),
            IdentityBackend::Local => Arc::new(
                LocalIdentityProvider::new(database.clone(), config.identity.jwt_secret.as_deref())
                    .with_token_expiry_hours(config.identity.jwt_expiry_hours),
            ),
        };

        let photos: Arc<dyn ObjectStore> = match config.storage.backend {
            StorageBackend::Supabase => Arc::new(SupabaseObjectStore::new(
                http,
                Self::supabase(config)?,
                config.storage.bucket.clone(),
            )),
            StorageBackend::Local => Arc::new(LocalObjectStore::new(
                config.storage.local_dir.clone(),
                &config.storage.public_base_url,
            )),
        };

        info!(
            identity = identity.name(),
            photos = photos.name(),
            "Server resources ready"
        );

        Ok(Self::new(database, generator, identity, photos)
            .with_max_photo_bytes(config.storage.max_photo_bytes))
    }

    fn supabase(config: &ServerConfig) -> AppResult<&SupabaseConfig> {
        config.supabase.as_ref().ok_or_else(|| {
            AppError::config("SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY are required")
        })
    }
}
