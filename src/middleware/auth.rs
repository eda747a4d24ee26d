// ABOUTME: Access control gate: bearer credential verification before identity-scoped operations
// ABOUTME: Delegates every token check to the injected identity provider and holds no credential state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::auth::{Identity, IdentityProvider};
use crate::errors::{AppError, AppResult, ErrorCode};

const MISSING_HEADER: &str = "Missing Authorization header";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// Bearer token gate in front of the identity-scoped routes
///
/// The resolved [`Identity`] lives only for the request that produced it;
/// nothing is cached between requests.
#[derive(Clone)]
pub struct AccessGate {
    provider: Arc<dyn IdentityProvider>,
}

impl AccessGate {
    /// Create a gate backed by `provider`
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Authenticate the `Authorization` header of a request
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when the header is absent and `AuthInvalid` when
    /// the identity provider rejects the token
    pub async fn authenticate_headers(&self, headers: &HeaderMap) -> AppResult<Identity> {
        let header = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
        self.authenticate(header).await
    }

    /// Authenticate a raw `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when the header is absent and `AuthInvalid` when
    /// the identity provider rejects the token
    #[tracing::instrument(
        skip(self, auth_header),
        fields(provider = self.provider.name(), user_id = tracing::field::Empty)
    )]
    pub async fn authenticate(&self, auth_header: Option<&str>) -> AppResult<Identity> {
        let Some(header) = auth_header.filter(|h| !h.trim().is_empty()) else {
            tracing::warn!("Authentication failed: missing authorization header");
            return Err(AppError::auth_required(MISSING_HEADER));
        };

        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        if token.is_empty() {
            tracing::warn!("Authentication failed: empty bearer token");
            return Err(AppError::auth_invalid(INVALID_TOKEN));
        }

        match self.provider.verify(token).await {
            Ok(identity) => {
                tracing::Span::current().record("user_id", identity.id.as_str());
                tracing::debug!("Bearer token accepted");
                Ok(identity)
            }
            Err(e) if e.code == ErrorCode::AuthInvalid => {
                tracing::warn!("Authentication failed: token rejected by identity provider");
                Err(AppError::auth_invalid(INVALID_TOKEN))
            }
            Err(e) => {
                tracing::warn!(code = ?e.code, "Authentication failed: identity provider error");
                Err(e)
            }
        }
    }
}
