// ABOUTME: Google Gemini provider for the generative backend contract
// ABOUTME: Issues one generateContent call per request with optional JSON response mime type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Provider
//!
//! Implementation of [`LlmProvider`] for Google's Gemini models over the
//! Generative Language REST API.
//!
//! ## Configuration
//!
//! `GEMINI_API_KEY` (or `API_KEY`) carries the key from Google AI Studio and
//! `GEMINI_MODEL` overrides the default `gemini-2.5-flash`. Both are read by
//! `ServerConfig`, not here.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

/// Default model to use
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Mime type requested when the caller wants JSON output
const JSON_MIME_TYPE: &str = "application/json";

const SERVICE: &str = "Gemini";

/// Gemini API request structure
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

/// Text part of a content block
#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: &'static str,
    candidate_count: u32,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

/// Usage metadata from Gemini API response
#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// Google Gemini provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    default_model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            default_model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Bound every request with a client-side timeout
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, AppError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build Gemini HTTP client: {e}")))?;
        Ok(self)
    }

    /// Build the API URL for a model and method
    fn build_url(&self, model: &str, method: &str) -> String {
        format!("{API_BASE_URL}/models/{model}:{method}?key={}", self.api_key)
    }

    /// Build a Gemini API request from a `ChatRequest`
    fn build_gemini_request(request: &ChatRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![ContentPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: request.json_output.then_some(GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                candidate_count: 1,
            }),
        }
    }

    /// Read a successful `generateContent` body into a `ChatResponse`
    fn parse_response(model: &str, response_text: &str) -> Result<ChatResponse, AppError> {
        let response: GeminiResponse = serde_json::from_str(response_text)
            .map_err(|e| AppError::external_service(SERVICE, format!("unreadable response: {e}")))?;

        if let Some(error) = response.error {
            return Err(AppError::external_service(SERVICE, error.message));
        }

        let content = Self::extract_content(&response)?;
        let first = response.candidates.as_ref().and_then(|c| c.first());

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            usage: response.usage_metadata.as_ref().map(Self::convert_usage),
            finish_reason: first.and_then(|c| c.finish_reason.clone()),
        })
    }

    /// Concatenate the text parts of the first candidate
    fn extract_content(response: &GeminiResponse) -> Result<String, AppError> {
        let text: String = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::external_service(SERVICE, "empty response"));
        }
        Ok(text)
    }

    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt.unwrap_or(0),
            completion_tokens: metadata.candidates.unwrap_or(0),
            total_tokens: metadata.total.unwrap_or(0),
        }
    }

    /// Map API error status to appropriate error type
    fn map_api_error(status: u16, response_text: &str) -> AppError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        match status {
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                Self::extract_quota_message(&message),
            ),
            500..=599 => AppError::external_unavailable(SERVICE, format!("({status}) {message}")),
            _ => AppError::external_service(SERVICE, format!("({status}) {message}")),
        }
    }

    /// Extract a readable quota message ("Please retry in 6.4s.") from a Gemini error
    fn extract_quota_message(message: &str) -> String {
        const MARKER: &str = "Please retry in ";
        let seconds = message.find(MARKER).and_then(|pos| {
            let after = &message[pos + MARKER.len()..];
            after
                .find('s')
                .and_then(|end| after[..end].parse::<f64>().ok())
        });

        seconds.map_or_else(
            || "Gemini quota exceeded".to_owned(),
            |seconds| format!("Gemini quota exceeded, retry in {} seconds", seconds.ceil() as u64),
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::config("Gemini API key is not configured"));
        }

        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let url = self.build_url(model, "generateContent");
        let gemini_request = Self::build_gemini_request(request);

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| AppError::external_unavailable(SERVICE, e.without_url()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| AppError::external_unavailable(SERVICE, e.without_url()))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let chat_response = Self::parse_response(model, &response_text)?;
        debug!(chars = chat_response.content.len(), "Received Gemini response");
        Ok(chat_response)
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("default_model", &self.default_model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_sets_response_mime_type() {
        let request = ChatRequest::new("plan please").with_json_output();

        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();

        assert_eq!(
            body["generation_config"]["response_mime_type"],
            "application/json"
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "plan please");
    }

    #[test]
    fn test_plain_request_omits_generation_config() {
        let request = ChatRequest::new("hi");
        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();
        assert!(body.get("generation_config").is_none());
    }

    #[test]
    fn test_response_carries_usage_and_finish_reason() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": " 1}"}]},
                "finishReason": "MAX_TOKENS"
            }],
            "usageMetadata": {"promptTokenCount": 812, "candidatesTokenCount": 64, "totalTokenCount": 876}
        }"#;

        let response = GeminiProvider::parse_response("gemini-test", body).unwrap();

        assert_eq!(response.content, "{\"a\": 1}");
        assert_eq!(response.model, "gemini-test");
        assert!(response.is_truncated());
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 812);
        assert_eq!(usage.completion_tokens, 64);
        assert_eq!(usage.total_tokens, 876);
    }

    #[test]
    fn test_error_body_is_an_error() {
        let error =
            GeminiProvider::parse_response("m", r#"{"error": {"message": "bad key"}}"#).unwrap_err();
        assert!(error.message.contains("bad key"));
    }

    #[test]
    fn test_rate_limit_maps_to_rate_limited_code() {
        let error = GeminiProvider::map_api_error(
            429,
            r#"{"error": {"message": "Quota exceeded. Please retry in 6.4s."}}"#,
        );
        assert_eq!(error.code, ErrorCode::ExternalRateLimited);
        assert!(error.message.contains("7 seconds"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = GeminiProvider::new("secret-key");
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_empty_candidate_is_an_error() {
        assert!(GeminiProvider::parse_response(
            "m",
            r#"{"candidates": [{"content": {"parts": []}}]}"#
        )
        .is_err());
    }
}
