// ABOUTME: Authentication routes: register, login and current identity
// ABOUTME: Validates credentials shape locally and delegates everything else to the identity provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use super::{ApiJson, ApiResponse};
use crate::auth::{AuthSession, Identity};
use crate::constants::auth::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Registration and login body
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl CredentialsRequest {
    fn validate_registration(&self) -> AppResult<()> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }

    fn validate_login(&self) -> AppResult<()> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AppError::invalid_input("Password is required"));
        }
        Ok(())
    }
}

/// Minimal email shape check: `local@domain.tld`, no whitespace
fn validate_email(email: &str) -> AppResult<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(name, tld)| !name.is_empty() && !tld.is_empty())
        })
        && !email.chars().any(char::is_whitespace);

    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_input("Invalid email address"))
    }
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::handle_register))
            .route("/auth/login", post(Self::handle_login))
            .route("/auth/me", get(Self::handle_me))
            .with_state(resources)
    }

    /// Handle POST /auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<CredentialsRequest>,
    ) -> Result<ApiResponse<AuthSession>, AppError> {
        request.validate_registration()?;

        let result = resources
            .identity
            .sign_up(request.email.trim(), &request.password)
            .await;
        let user_id = result.as_ref().map_or("-", |s| s.user.id.as_str());
        AppLogger::log_auth_event(user_id, "register", result.is_ok(), None);

        result.map(ApiResponse::ok)
    }

    /// Handle POST /auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<CredentialsRequest>,
    ) -> Result<ApiResponse<AuthSession>, AppError> {
        request.validate_login()?;

        let result = resources
            .identity
            .sign_in(request.email.trim(), &request.password)
            .await;
        let user_id = result.as_ref().map_or("-", |s| s.user.id.as_str());
        AppLogger::log_auth_event(user_id, "login", result.is_ok(), None);

        result.map(ApiResponse::ok)
    }

    /// Handle GET /auth/me
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<ApiResponse<Identity>, AppError> {
        let identity = resources.gate.authenticate_headers(&headers).await?;
        Ok(ApiResponse::ok(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(validate_email("runner@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
        assert!(validate_email("runner@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("runner example@x.com").is_err());
        assert!(validate_email("runner").is_err());
    }

    #[test]
    fn test_registration_password_length() {
        let short = CredentialsRequest {
            email: "a@b.co".to_owned(),
            password: "12345".to_owned(),
        };
        assert!(short.validate_registration().is_err());

        let ok = CredentialsRequest {
            email: "a@b.co".to_owned(),
            password: "123456".to_owned(),
        };
        assert!(ok.validate_registration().is_ok());
    }
}
