// ABOUTME: Integration tests for the plan generator against scripted generative backends
// ABOUTME: Every backend failure mode resolves to a plan and reports the degradation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{sample_profile, test_generator, Script, ScriptedLlm};
use nutristrong_server::config::LlmConfig;
use nutristrong_server::errors::ErrorCode;
use nutristrong_server::models::ComprehensivePlan;
use nutristrong_server::plans::{GenerationOutcome, PlanGenerator};

#[tokio::test]
async fn test_readable_reply_is_generated_plan() {
    let llm = ScriptedLlm::replying_with_plan();
    let generator = test_generator(llm.clone());

    let generation = generator.generate_with_outcome(&sample_profile()).await;

    assert_eq!(generation.outcome, GenerationOutcome::Generated);
    assert_eq!(generation.outcome.source_label(), "generated");
    assert_eq!(generation.plan.weekly_meals.len(), 7);
    assert_eq!(generation.plan.daily_calories, 2600);
}

#[tokio::test]
async fn test_single_request_carries_prompt_and_json_mode() {
    let llm = ScriptedLlm::replying_with_plan();
    let generator = PlanGenerator::new(llm.clone()).with_model("gemini-test");
    let profile = sample_profile();

    generator.generate(&profile).await;

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.json_output);
    assert_eq!(request.model.as_deref(), Some("gemini-test"));
    assert!(request.prompt.contains("- Goal: Gain Muscle"));
    assert!(request.prompt.contains("- Allergies: peanuts"));
}

#[tokio::test]
async fn test_backend_timeout_resolves_to_fallback() {
    let llm = ScriptedLlm::new(Script::Hang);
    let generator = PlanGenerator::new(llm).with_timeout(Duration::from_millis(50));

    let started = Instant::now();
    let generation = generator.generate_with_outcome(&sample_profile()).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(generation.outcome.is_degraded());
    assert_eq!(generation.outcome.source_label(), "fallback");
    assert_eq!(generation.plan, ComprehensivePlan::fallback());
}

#[tokio::test]
async fn test_quota_error_resolves_to_fallback() {
    let generator = test_generator(ScriptedLlm::new(Script::Fail(ErrorCode::ExternalRateLimited)));
    let plan = generator.generate(&sample_profile()).await;
    assert!(plan.is_fallback());
}

#[tokio::test]
async fn test_unavailable_backend_resolves_to_fallback() {
    let generator = test_generator(ScriptedLlm::new(Script::Fail(
        ErrorCode::ExternalServiceUnavailable,
    )));
    let generation = generator.generate_with_outcome(&sample_profile()).await;
    match generation.outcome {
        GenerationOutcome::Degraded { reason } => assert!(reason.contains("scripted failure")),
        GenerationOutcome::Generated => panic!("expected a degraded outcome"),
    }
}

#[tokio::test]
async fn test_malformed_reply_resolves_to_fallback() {
    for reply in ["", "not json at all", "{\"summary\": ", "```json\n{}\n```"] {
        let generator = test_generator(ScriptedLlm::replying(reply));
        let generation = generator.generate_with_outcome(&sample_profile()).await;
        assert!(generation.outcome.is_degraded(), "reply: {reply:?}");
        assert!(generation.plan.is_fallback());
    }
}

#[tokio::test]
async fn test_concurrent_generations_are_independent() {
    let generator = Arc::new(test_generator(ScriptedLlm::replying_with_plan()));
    let profile = sample_profile();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let generator = generator.clone();
            let profile = profile.clone();
            tokio::spawn(async move { generator.generate(&profile).await })
        })
        .collect();

    for handle in handles {
        let plan = handle.await.unwrap();
        assert!(!plan.is_fallback());
    }
}

#[tokio::test]
async fn test_configured_generator_without_key_degrades_without_network() {
    let config = LlmConfig {
        api_key: None,
        model: "gemini-test".to_owned(),
        timeout: Duration::from_secs(5),
    };
    let generator = PlanGenerator::from_config(&config).unwrap();

    let generation = generator.generate_with_outcome(&sample_profile()).await;

    assert!(generation.outcome.is_degraded());
    assert_eq!(generation.plan, ComprehensivePlan::fallback());
}
