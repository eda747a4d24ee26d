// ABOUTME: Self-contained identity provider over the local users table
// ABOUTME: bcrypt password hashes and HS256 bearer tokens with an "authenticated" audience
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{AuthSession, Identity, IdentityProvider, SessionTokens};
use crate::constants::auth::{BCRYPT_COST, DEFAULT_JWT_EXPIRY_HOURS, TOKEN_AUDIENCE};
use crate::database::{Database, UserRecord};
use crate::errors::{AppError, AppResult};

const INVALID_CREDENTIALS: &str = "Invalid login credentials";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// Token claims issued by the local provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id
    pub sub: String,
    pub email: String,
    /// Audience, always "authenticated"
    pub aud: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Identity provider backed by the local database
#[derive(Clone)]
pub struct LocalIdentityProvider {
    database: Database,
    secret: Vec<u8>,
    token_expiry_hours: i64,
    bcrypt_cost: u32,
}

impl std::fmt::Debug for LocalIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalIdentityProvider")
            .field("secret", &"[REDACTED]")
            .field("token_expiry_hours", &self.token_expiry_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl LocalIdentityProvider {
    /// Create a provider signing with `secret`, or with a random per-process
    /// secret when none is configured
    #[must_use]
    pub fn new(database: Database, secret: Option<&str>) -> Self {
        let secret = secret.map_or_else(
            || {
                warn!("JWT_SECRET not set; local tokens will not survive a restart");
                random_secret()
            },
            |s| s.as_bytes().to_vec(),
        );
        Self {
            database,
            secret,
            token_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            bcrypt_cost: BCRYPT_COST,
        }
    }

    /// Override the token lifetime
    #[must_use]
    pub const fn with_token_expiry_hours(mut self, hours: i64) -> Self {
        self.token_expiry_hours = hours;
        self
    }

    /// Override the bcrypt work factor (tests use the minimum)
    #[must_use]
    pub const fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Issue a signed token for an account
    ///
    /// # Errors
    ///
    /// Returns an internal error if signing fails
    pub fn issue_token(&self, user_id: &str, email: &str) -> AppResult<SessionTokens> {
        let now = Utc::now();
        let lifetime = self.token_lifetime()?;
        let expiry = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| self.invalid_lifetime())?;
        let claims = Claims {
            sub: user_id.to_owned(),
            email: email.to_owned(),
            aud: TOKEN_AUDIENCE.to_owned(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))?;

        Ok(SessionTokens {
            access_token,
            token_type: "bearer".to_owned(),
            expires_in: lifetime.num_seconds(),
            refresh_token: None,
        })
    }

    fn token_lifetime(&self) -> AppResult<Duration> {
        Duration::try_hours(self.token_expiry_hours)
            .filter(|d| *d > Duration::zero())
            .ok_or_else(|| self.invalid_lifetime())
    }

    fn invalid_lifetime(&self) -> AppError {
        AppError::config(format!(
            "Token lifetime of {} hours is out of range",
            self.token_expiry_hours
        ))
    }

    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[TOKEN_AUDIENCE]);

        decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => debug!("Local token expired"),
                    kind => debug!(?kind, "Local token rejected"),
                }
                AppError::auth_invalid(INVALID_TOKEN)
            })
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn verify(&self, token: &str) -> AppResult<Identity> {
        let claims = self.decode_token(token)?;
        Ok(Identity::new(claims.sub, Some(claims.email)))
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        // Fail before the account row exists
        self.token_lifetime()?;

        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: email.to_lowercase(),
            password_hash,
            created_at: Utc::now().to_rfc3339(),
        };
        self.database.create_user(&user).await?;

        let session = self.issue_token(&user.id, &user.email)?;
        Ok(AuthSession {
            user: Identity::new(user.id, Some(user.email)),
            session: Some(session),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let Some(user) = self.database.get_user_by_email(email).await? else {
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        };

        let password = password.to_owned();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Password check task failed: {e}")))?
            .unwrap_or(false);

        if !matches {
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        }

        let session = self.issue_token(&user.id, &user.email)?;
        Ok(AuthSession {
            user: Identity::new(user.id, Some(user.email)),
            session: Some(session),
        })
    }
}

fn random_secret() -> Vec<u8> {
    let mut bytes = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes).into_bytes()
}
