// ABOUTME: Plan generation pipeline: prompt builder, generative backend call, normalizer
// ABOUTME: PlanGenerator never fails; every degradation resolves to the Fallback Plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Generation
//!
//! [`PlanGenerator`] runs one best-effort attempt per call:
//!
//! 1. [`prompt::build_prompt`] renders the profile
//! 2. one [`LlmProvider::complete`] call, bounded by a timeout
//! 3. [`normalizer::try_normalize`] reads the response
//!
//! Any failure in steps 2 or 3 (transport error, quota, timeout, malformed
//! document) is logged at `warn` and replaced by
//! [`ComprehensivePlan::fallback`]. There is no retry.

pub mod normalizer;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::constants::plans::DEFAULT_GENERATION_TIMEOUT_SECS;
use crate::errors::{AppError, AppResult};
use crate::config::LlmConfig;
use crate::llm::{ChatRequest, GeminiProvider, LlmProvider};
use crate::models::{ComprehensivePlan, Profile};

pub use normalizer::normalize;
pub use prompt::build_prompt;

/// How a plan was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The backend returned a complete, readable plan
    Generated,
    /// Generation failed and the Fallback Plan was substituted
    Degraded {
        /// Why generation degraded, for logs only
        reason: String,
    },
}

impl GenerationOutcome {
    /// Short label for the plan source (`generated` or `fallback`)
    #[must_use]
    pub const fn source_label(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Degraded { .. } => "fallback",
        }
    }

    /// Whether the Fallback Plan was substituted
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// A plan together with how it was obtained
#[derive(Debug, Clone)]
pub struct PlanGeneration {
    /// The generated plan or the Fallback Plan
    pub plan: ComprehensivePlan,
    /// Whether generation succeeded
    pub outcome: GenerationOutcome,
}

/// Prompt → generative backend → normalizer, with fallback
#[derive(Clone)]
pub struct PlanGenerator {
    llm: Arc<dyn LlmProvider>,
    model: Option<String>,
    timeout: Duration,
}

impl PlanGenerator {
    /// Create a generator using the provider's default model
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            model: None,
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }

    /// Build a Gemini-backed generator from the backend settings
    ///
    /// A missing API key is not an error: every generation then degrades to
    /// the Fallback Plan.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be built
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        let api_key = config.api_key.clone().unwrap_or_else(|| {
            warn!("GEMINI_API_KEY not set; every plan generation will return the fallback plan");
            String::new()
        });
        let provider = GeminiProvider::new(api_key)
            .with_default_model(config.model.clone())
            .with_timeout(config.timeout)?;

        Ok(Self::new(Arc::new(provider))
            .with_model(config.model.clone())
            .with_timeout(config.timeout))
    }

    /// Pin the model identifier sent with every request
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Upper bound on one backend call
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate a plan, or the Fallback Plan on any failure
    pub async fn generate(&self, profile: &Profile) -> ComprehensivePlan {
        self.generate_with_outcome(profile).await.plan
    }

    /// Generate a plan and report whether the Fallback Plan was substituted
    #[instrument(skip(self, profile), fields(provider = self.llm.name(), goal = %profile.goal))]
    pub async fn generate_with_outcome(&self, profile: &Profile) -> PlanGeneration {
        match self.try_generate(profile).await {
            Ok(plan) => {
                info!(
                    days = plan.weekly_meals.len(),
                    workouts = plan.weekly_workouts.len(),
                    "Plan generated"
                );
                PlanGeneration {
                    plan,
                    outcome: GenerationOutcome::Generated,
                }
            }
            Err(error) => {
                warn!(code = ?error.code, error = %error, "Plan generation degraded to fallback plan");
                PlanGeneration {
                    plan: ComprehensivePlan::fallback(),
                    outcome: GenerationOutcome::Degraded {
                        reason: error.message,
                    },
                }
            }
        }
    }

    async fn try_generate(&self, profile: &Profile) -> AppResult<ComprehensivePlan> {
        let mut request = ChatRequest::new(build_prompt(profile)).with_json_output();
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let response = tokio::time::timeout(self.timeout, self.llm.complete(&request))
            .await
            .map_err(|_| {
                AppError::external_unavailable(
                    self.llm.name(),
                    format!("no response within {}s", self.timeout.as_secs()),
                )
            })??;

        if let Some(usage) = response.usage {
            info!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Plan generation token usage"
            );
        }
        if response.is_truncated() {
            warn!(
                model = %response.model,
                chars = response.content.len(),
                "Generated plan was cut off at the output token limit"
            );
        }

        normalizer::try_normalize(&response.content)
    }
}
