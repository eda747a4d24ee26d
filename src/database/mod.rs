// ABOUTME: SQLite persistence for profiles, plans, meal and workout days, progress logs and users
// ABOUTME: Owns the connection pool and creates every table idempotently at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! One [`Database`] handle wraps the sqlx pool. Operations are split per table
//! into submodules that each add an `impl Database` block. Every record is
//! keyed by the identity id issued by the identity provider; writes are
//! upserts (last write wins) except for progress logs, which are append-only.
//!
//! Failures convert to `DatabaseError` through `From<sqlx::Error>` and are
//! surfaced to callers.

pub mod mappers;
mod meals;
mod profiles;
mod progress;
mod users;
mod workouts;

pub use mappers::ProfileWithPlan;
pub use meals::MealPlanRecord;
pub use profiles::StoredProfile;
pub use progress::{ProgressKind, ProgressLog};
pub use users::UserRecord;
pub use workouts::WorkoutRecord;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::config::DatabaseUrl;
use crate::constants::database::MAX_CONNECTIONS;
use crate::errors::{AppError, AppResult};

/// Database manager for profile, plan and log storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open the database and create missing tables
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let pool = match url {
            // A single never-recycled connection keeps the in-memory database alive
            DatabaseUrl::Memory => {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect("sqlite::memory:")
                    .await?
            }
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                let options = SqliteConnectOptions::from_str(&url.to_connection_string())?
                    .create_if_missing(true);
                SqlitePoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .connect_with(options)
                    .await?
            }
        };

        let db = Self { pool };
        db.migrate().await?;
        info!(url = %url.to_connection_string(), "Database ready");
        Ok(db)
    }

    /// In-memory database, used by tests and the command line tool
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the schema cannot be created
    pub async fn in_memory() -> AppResult<Self> {
        Self::new(&DatabaseUrl::Memory).await
    }

    /// Close every pooled connection, waiting for in-flight queries
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if table creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_profiles().await?;
        self.migrate_meals().await?;
        self.migrate_workouts().await?;
        self.migrate_progress().await?;
        self.migrate_users().await?;
        Ok(())
    }

    /// Round trip used by the readiness probe
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database does not answer
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Current time as stored in timestamp columns
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
