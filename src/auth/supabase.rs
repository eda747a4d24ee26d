// ABOUTME: Identity provider backed by a Supabase (GoTrue) auth endpoint
// ABOUTME: Verifies bearer tokens and proxies sign-up/sign-in with the service role key

//! GoTrue endpoints used:
//!
//! | Operation | Endpoint |
//! |---|---|
//! | verify | `GET /auth/v1/user` with the caller's bearer token |
//! | sign up | `POST /auth/v1/signup` |
//! | sign in | `POST /auth/v1/token?grant_type=password` |
//!
//! Every call carries the `apikey` header.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{AuthSession, Identity, IdentityProvider, SessionTokens};
use crate::config::SupabaseConfig;
use crate::errors::{AppError, AppResult};

const SERVICE: &str = "Identity provider";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// User object as returned by GoTrue
#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<GoTrueUser> for Identity {
    fn from(user: GoTrueUser) -> Self {
        Self::new(user.id, user.email)
    }
}

/// Session object as returned by the token and signup endpoints
#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
    user: GoTrueUser,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl From<GoTrueSession> for AuthSession {
    fn from(session: GoTrueSession) -> Self {
        Self {
            user: session.user.into(),
            session: Some(SessionTokens {
                access_token: session.access_token,
                token_type: session.token_type,
                expires_in: session.expires_in,
                refresh_token: session.refresh_token,
            }),
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Supabase identity provider
#[derive(Clone)]
pub struct SupabaseIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Debug for SupabaseIdentityProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SupabaseIdentityProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SupabaseIdentityProvider {
    /// Create a provider for a Supabase project
    #[must_use]
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_owned(),
            api_key: config.service_role_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn with_api_key(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.api_key)
    }

    async fn send(builder: RequestBuilder) -> AppResult<(StatusCode, String)> {
        let response: Response = builder
            .send()
            .await
            .map_err(|e| AppError::external_unavailable(SERVICE, e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::external_unavailable(SERVICE, e.without_url()))?;
        Ok((status, body))
    }

    /// Pull the human-readable message out of a GoTrue error body
    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                ["msg", "error_description", "message", "error"]
                    .iter()
                    .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_owned))
            })
            .unwrap_or_else(|| body.to_owned())
    }

    fn unexpected(status: StatusCode, body: &str) -> AppError {
        let message = format!("({status}) {}", Self::error_message(body));
        if status.is_server_error() {
            AppError::external_unavailable(SERVICE, message)
        } else {
            AppError::external_service(SERVICE, message)
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn verify(&self, token: &str) -> AppResult<Identity> {
        let request = self
            .with_api_key(self.client.get(self.endpoint("user")))
            .bearer_auth(token);
        let (status, body) = Self::send(request).await?;

        match status.as_u16() {
            200..=299 => {
                let user: GoTrueUser = serde_json::from_str(&body).map_err(|e| {
                    AppError::external_service(SERVICE, format!("unreadable user: {e}"))
                })?;
                Ok(user.into())
            }
            400 | 401 | 403 => {
                debug!(status = %status, "Identity provider rejected token");
                Err(AppError::auth_invalid(INVALID_TOKEN))
            }
            _ => Err(Self::unexpected(status, &body)),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let request = self
            .with_api_key(self.client.post(self.endpoint("signup")))
            .json(&Credentials { email, password });
        let (status, body) = Self::send(request).await?;

        if status.is_success() {
            // With email confirmation enabled the endpoint returns the bare user
            if let Ok(session) = serde_json::from_str::<GoTrueSession>(&body) {
                return Ok(session.into());
            }
            let user: GoTrueUser = serde_json::from_str(&body).map_err(|e| {
                AppError::external_service(SERVICE, format!("unreadable signup response: {e}"))
            })?;
            return Ok(AuthSession {
                user: user.into(),
                session: None,
            });
        }

        let message = Self::error_message(&body);
        warn!(status = %status, "Sign-up rejected: {message}");
        match status.as_u16() {
            400 | 422 if message.to_lowercase().contains("already") => {
                Err(AppError::already_exists(message))
            }
            400 | 422 => Err(AppError::invalid_input(message)),
            _ => Err(Self::unexpected(status, &body)),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let request = self
            .with_api_key(self.client.post(self.endpoint("token")))
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password });
        let (status, body) = Self::send(request).await?;

        if status.is_success() {
            let session: GoTrueSession = serde_json::from_str(&body).map_err(|e| {
                AppError::external_service(SERVICE, format!("unreadable session: {e}"))
            })?;
            return Ok(session.into());
        }

        match status.as_u16() {
            400 | 401 | 422 => Err(AppError::auth_invalid(Self::error_message(&body))),
            _ => Err(Self::unexpected(status, &body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_gotrue_fields() {
        assert_eq!(
            SupabaseIdentityProvider::error_message(
                r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#
            ),
            "Invalid login credentials"
        );
        assert_eq!(
            SupabaseIdentityProvider::error_message(
                r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#
            ),
            "Email not confirmed"
        );
        assert_eq!(
            SupabaseIdentityProvider::error_message("gateway down"),
            "gateway down"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = SupabaseConfig {
            url: "https://project.supabase.co/".to_owned(),
            service_role_key: "service-secret".to_owned(),
        };
        let provider = SupabaseIdentityProvider::new(Client::new(), &config);
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("service-secret"));
        assert_eq!(
            provider.endpoint("user"),
            "https://project.supabase.co/auth/v1/user"
        );
    }
}
