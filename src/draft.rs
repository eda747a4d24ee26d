// ABOUTME: Onboarding draft store: the profile-in-progress that survives restarts
// ABOUTME: DraftStore contract with in-memory and JSON-file implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Onboarding Drafts
//!
//! A draft holds a profile that is still being filled in, plus the last plan
//! generated for it, until an account exists to save them to. The plan
//! service never reads drafts; callers hand it a finished [`Profile`].
//!
//! [`FileDraftStore`] is the durable boundary: one JSON document, replaced
//! atomically on every write.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::{ComprehensivePlan, Profile};

/// File name used under the platform data directory
const DRAFT_FILE: &str = "draft.json";

/// Profile-in-progress and its latest generated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingDraft {
    pub profile: Profile,
    #[serde(default)]
    pub plan: Option<ComprehensivePlan>,
    /// RFC 3339 time of the last write
    pub updated_at: String,
}

impl OnboardingDraft {
    /// Draft for `profile` with no plan yet
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            plan: None,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Draft persistence contract
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Current draft, if any
    async fn get(&self) -> AppResult<Option<OnboardingDraft>>;

    /// Replace the current draft
    async fn set(&self, draft: &OnboardingDraft) -> AppResult<()>;

    /// Discard the current draft; clearing an empty store is not an error
    async fn clear(&self) -> AppResult<()>;
}

/// Draft store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    draft: Arc<RwLock<Option<OnboardingDraft>>>,
}

impl MemoryDraftStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn get(&self) -> AppResult<Option<OnboardingDraft>> {
        Ok(self.draft.read().await.clone())
    }

    async fn set(&self, draft: &OnboardingDraft) -> AppResult<()> {
        *self.draft.write().await = Some(draft.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.draft.write().await = None;
        Ok(())
    }
}

/// Draft store persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    /// Store backed by the file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform data directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the platform has no data directory
    pub fn default_location() -> AppResult<Self> {
        let dir = dirs::data_local_dir()
            .ok_or_else(|| AppError::config("No local data directory for the draft store"))?;
        Ok(Self::new(dir.join("nutristrong").join(DRAFT_FILE)))
    }

    /// Backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, e: &std::io::Error) -> AppError {
        AppError::storage(format!(
            "Failed to {action} draft {}: {e}",
            self.path.display()
        ))
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn get(&self) -> AppResult<Option<OnboardingDraft>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error("read", &e)),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn set(&self, draft: &OnboardingDraft) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error("create directory for", &e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(draft)?)
            .await
            .map_err(|e| self.io_error("write", &e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                debug!(error = %cleanup, "Could not remove temporary draft file");
            }
            return Err(self.io_error("replace", &e));
        }

        debug!(path = %self.path.display(), "Draft saved");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", &e)),
        }
    }
}
