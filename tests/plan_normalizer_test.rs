// ABOUTME: Integration tests for the generated-plan normalizer
// ABOUTME: Covers key mapping, fallback on unreadable text and empty-array degradation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use nutristrong_server::models::{ComprehensivePlan, FALLBACK_SHOPPING_ITEM};
use nutristrong_server::plans::{normalize, normalizer::try_normalize};
use serde_json::{json, Value};

fn as_u32(value: &Value) -> u32 {
    u32::try_from(value.as_u64().unwrap()).unwrap()
}

fn assert_matches_document(plan: &ComprehensivePlan, doc: &Value) {
    assert_eq!(plan.summary, doc["summary"].as_str().unwrap());
    assert_eq!(plan.daily_calories, as_u32(&doc["daily_calories"]));
    assert_eq!(plan.macro_target.protein, as_u32(&doc["macros"]["protein"]));
    assert_eq!(plan.macro_target.carbs, as_u32(&doc["macros"]["carbs"]));
    assert_eq!(plan.macro_target.fats, as_u32(&doc["macros"]["fats"]));

    let meals = doc["weekly_meals"].as_array().unwrap();
    assert_eq!(plan.weekly_meals.len(), meals.len());
    for (day, raw) in plan.weekly_meals.iter().zip(meals) {
        assert_eq!(day.day_name, raw["day_name"].as_str().unwrap());
        assert_eq!(day.breakfast.name, raw["breakfast"]["name"].as_str().unwrap());
        assert_eq!(day.snack.calories, as_u32(&raw["snack"]["calories"]));
        assert_eq!(
            day.dinner.ingredients.len(),
            raw["dinner"]["ingredients"].as_array().unwrap().len()
        );
    }

    let workouts = doc["weekly_workouts"].as_array().unwrap();
    assert_eq!(plan.weekly_workouts.len(), workouts.len());
    for (day, raw) in plan.weekly_workouts.iter().zip(workouts) {
        assert_eq!(day.day_name, raw["day_name"].as_str().unwrap());
        assert_eq!(day.focus, raw["focus"].as_str().unwrap());
        assert_eq!(day.duration_minutes, as_u32(&raw["duration_minutes"]));
        assert_eq!(day.exercises.len(), raw["exercises"].as_array().unwrap().len());
        assert_eq!(day.exercises[0].reps, raw["exercises"][0]["reps"].as_str().unwrap());
    }

    let shopping: Vec<&str> = doc["shopping_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(plan.shopping_list, shopping);
}

#[test]
fn test_schema_conforming_documents_map_field_for_field() {
    for (meal_days, workout_days) in [(7, 7), (7, 5), (3, 0), (0, 2), (10, 7)] {
        let doc = common::sample_plan_document(meal_days, workout_days);
        let plan = normalize(&doc.to_string());
        assert!(!plan.is_fallback());
        assert_matches_document(&plan, &doc);
    }
}

#[test]
fn test_fenced_document_is_read() {
    let doc = common::sample_plan_document(7, 7);
    let fenced = format!("```json\n{}\n```", serde_json::to_string_pretty(&doc).unwrap());
    let plan = normalize(&fenced);
    assert_matches_document(&plan, &doc);
}

#[test]
fn test_fence_tag_sharing_the_document_line_is_read() {
    let doc = common::sample_plan_document(7, 7);
    let plan = normalize(&format!("```json{doc}```"));
    assert!(!plan.is_fallback());
    assert_matches_document(&plan, &doc);
}

#[test]
fn test_unreadable_text_yields_the_fallback_plan() {
    let doc = common::sample_plan_document(7, 7).to_string();
    let truncated = &doc[..doc.len() / 2];
    let inputs = [
        String::new(),
        "   ".to_owned(),
        "Sorry, I cannot help with that request.".to_owned(),
        truncated.to_owned(),
        format!("Here is your plan: {doc}"),
        "[1, 2, 3]".to_owned(),
        "{\"summary\": \"only a summary\"}".to_owned(),
    ];

    for input in inputs {
        let plan = normalize(&input);
        assert_eq!(plan, ComprehensivePlan::fallback(), "input: {input:?}");
        assert_eq!(plan.shopping_list, vec![FALLBACK_SHOPPING_ITEM.to_owned()]);
    }
}

#[test]
fn test_missing_workouts_key_degrades_to_empty_list() {
    let mut doc = common::sample_plan_document(7, 7);
    doc.as_object_mut().unwrap().remove("weekly_workouts");

    let plan = normalize(&doc.to_string());
    assert!(!plan.is_fallback());
    assert!(plan.weekly_workouts.is_empty());
    assert_eq!(plan.weekly_meals.len(), 7);
}

#[test]
fn test_null_arrays_degrade_to_empty_lists() {
    let mut doc = common::sample_plan_document(2, 2);
    doc["weekly_meals"] = Value::Null;
    doc["shopping_list"] = Value::Null;

    let plan = normalize(&doc.to_string());
    assert!(!plan.is_fallback());
    assert!(plan.weekly_meals.is_empty());
    assert!(plan.shopping_list.is_empty());
    assert_eq!(plan.weekly_workouts.len(), 2);
}

#[test]
fn test_numeric_strings_are_accepted() {
    let mut doc = common::sample_plan_document(1, 1);
    doc["daily_calories"] = json!("2450");
    doc["macros"]["protein"] = json!("150.0");

    let plan = try_normalize(&doc.to_string()).unwrap();
    assert_eq!(plan.daily_calories, 2450);
    assert_eq!(plan.macro_target.protein, 150);
}

#[test]
fn test_missing_required_key_is_reported() {
    let mut doc = common::sample_plan_document(1, 1);
    doc.as_object_mut().unwrap().remove("daily_calories");
    assert!(try_normalize(&doc.to_string()).is_err());
}
