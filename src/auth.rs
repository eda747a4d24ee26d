// ABOUTME: Identity provider abstraction used by the access gate and the auth routes
// ABOUTME: Defines Identity, AuthSession and the IdentityProvider contract with its two backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Identity and Sessions
//!
//! The server never holds credential state of its own at the gate: every
//! bearer token is verified by an [`IdentityProvider`]. Two backends exist:
//!
//! - [`SupabaseIdentityProvider`]: GoTrue-compatible HTTP API
//! - [`LocalIdentityProvider`]: local users table, bcrypt hashes and HS256 tokens
//!
//! Both are injected at startup as `Arc<dyn IdentityProvider>`; tests
//! substitute a fake.

mod local;
mod supabase;

pub use local::LocalIdentityProvider;
pub use supabase::SupabaseIdentityProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

/// Minimal identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identity id; keys every stored record
    pub id: String,
    /// Email address, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    /// Create an identity
    #[must_use]
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// Bearer credentials issued on sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Result of a sign-up or sign-in
///
/// `session` is absent when the provider requires email confirmation before
/// issuing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: Identity,
    pub session: Option<SessionTokens>,
}

/// External identity provider contract
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider identifier used in logs
    fn name(&self) -> &'static str;

    /// Verify a bearer token and return the identity it belongs to
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` when the token is rejected, or an external
    /// service error when the provider cannot be reached
    async fn verify(&self, token: &str) -> AppResult<Identity>;

    /// Register a new account
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` or `ResourceAlreadyExists` for rejected sign-ups
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Exchange email and password for a session
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for bad credentials
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;
}
