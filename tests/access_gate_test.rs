// ABOUTME: Integration tests for the bearer-token access gate
// ABOUTME: Missing and provider-rejected credentials are Unauthorized; valid tokens attach the identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use common::{alice, StaticIdentityProvider, ALICE_TOKEN, BOB_TOKEN};
use nutristrong_server::auth::{AuthSession, Identity, IdentityProvider};
use nutristrong_server::errors::{AppError, AppResult, ErrorCode};
use nutristrong_server::middleware::AccessGate;
use std::sync::Arc;

fn gate() -> AccessGate {
    AccessGate::new(StaticIdentityProvider::new())
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let error = gate().authenticate_headers(&HeaderMap::new()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthRequired);
    assert_eq!(error.http_status(), 401);
}

#[tokio::test]
async fn test_blank_header_is_unauthorized() {
    let error = gate().authenticate(Some("   ")).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthRequired);

    let error = gate().authenticate(Some("Bearer ")).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
    assert_eq!(error.http_status(), 401);
}

#[tokio::test]
async fn test_provider_rejected_token_is_unauthorized() {
    let error = gate()
        .authenticate(Some("Bearer eyJhbGciOiJIUzI1NiJ9.e30.c2lnbmF0dXJl"))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
    assert_eq!(error.http_status(), 401);
    assert_eq!(error.message, "Invalid or expired token");
}

#[tokio::test]
async fn test_valid_token_attaches_identity() {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {ALICE_TOKEN}")).unwrap(),
    );

    let identity = gate().authenticate_headers(&headers).await.unwrap();
    assert_eq!(identity, alice());
    assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn test_raw_token_without_scheme_is_accepted() {
    let identity = gate().authenticate(Some(BOB_TOKEN)).await.unwrap();
    assert_eq!(identity.id, "user-bob");
}

struct UnreachableProvider;

#[async_trait]
impl IdentityProvider for UnreachableProvider {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn verify(&self, _token: &str) -> AppResult<Identity> {
        Err(AppError::external_unavailable("identity", "connection refused"))
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> AppResult<AuthSession> {
        Err(AppError::external_unavailable("identity", "connection refused"))
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> AppResult<AuthSession> {
        Err(AppError::external_unavailable("identity", "connection refused"))
    }
}

#[tokio::test]
async fn test_provider_outage_is_not_reported_as_bad_token() {
    let gate = AccessGate::new(Arc::new(UnreachableProvider));
    let error = gate.authenticate(Some("Bearer anything")).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
    assert_eq!(error.http_status(), 503);
}
