// ABOUTME: Generative backend abstraction used by the plan generator
// ABOUTME: Defines the LlmProvider contract and the chat request/response types it exchanges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Generative Backend Interface
//!
//! The plan generator talks to the generative backend only through
//! [`LlmProvider`], so tests substitute a scripted fake and the server
//! injects [`GeminiProvider`] at startup. One request, one response: there is
//! no streaming and no retry at this layer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutristrong_server::llm::{ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new("Return {} as JSON").with_json_output();
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod gemini;

pub use gemini::{GeminiProvider, DEFAULT_MODEL as GEMINI_DEFAULT_MODEL};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Finish reason reported when the backend stopped at its output token limit
pub const FINISH_REASON_MAX_TOKENS: &str = "MAX_TOKENS";

/// A single-turn completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Prompt text, sent as one user turn
    pub prompt: String,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Ask the backend to emit a JSON-typed response
    pub json_output: bool,
}

impl ChatRequest {
    /// Create a request for one prompt
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            json_output: false,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Request JSON-typed output
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Response from a completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (STOP, MAX_TOKENS, etc.)
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Whether the backend cut the response off at its output limit
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.finish_reason
            .as_deref()
            .is_some_and(|reason| reason.eq_ignore_ascii_case(FINISH_REASON_MAX_TOKENS))
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// Generative backend contract
///
/// Implementations must be cheap to share behind an `Arc`; the plan generator
/// issues exactly one `complete` call per generation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a single non-streaming completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}
