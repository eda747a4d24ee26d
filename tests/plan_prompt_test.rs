// ABOUTME: Integration tests for the plan-generation prompt builder
// ABOUTME: Every profile value appears in the prompt and rendering is deterministic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use nutristrong_server::models::{Gender, GoalType, Profile};
use nutristrong_server::plans::build_prompt;

fn profiles() -> Vec<Profile> {
    let genders = [Gender::Male, Gender::Female, Gender::Other];
    let goals = [
        GoalType::LoseFat,
        GoalType::Maintain,
        GoalType::GainMuscle,
        GoalType::AthleticPerformance,
    ];

    let mut profiles = vec![Profile::default(), common::sample_profile()];
    for (i, gender) in genders.iter().enumerate() {
        for (j, goal) in goals.iter().enumerate() {
            let step = u32::try_from(i * goals.len() + j).unwrap();
            profiles.push(Profile {
                age: 18 + step * 3,
                gender: *gender,
                height_cm: 150.0 + f64::from(step) * 2.5,
                weight_kg: 50.0 + f64::from(step) * 1.75,
                goal: *goal,
                activity_level: format!("Level {step}"),
                dietary_restrictions: format!("restriction-{step}"),
                allergies: format!("allergen-{step}"),
            });
        }
    }
    profiles
}

#[test]
fn test_prompt_contains_every_profile_value() {
    for profile in profiles() {
        let prompt = build_prompt(&profile);

        let expected = [
            profile.age.to_string(),
            profile.gender.to_string(),
            profile.height_cm.to_string(),
            profile.weight_kg.to_string(),
            profile.goal.to_string(),
            profile.activity_level.clone(),
        ];
        for value in expected {
            assert!(prompt.contains(&value), "prompt is missing {value:?}");
        }
        if !profile.dietary_restrictions.is_empty() {
            assert!(prompt.contains(&profile.dietary_restrictions));
        }
        if !profile.allergies.is_empty() {
            assert!(prompt.contains(&profile.allergies));
        }
    }
}

#[test]
fn test_prompt_is_deterministic() {
    for profile in profiles() {
        assert_eq!(build_prompt(&profile), build_prompt(&profile.clone()));
    }
}

#[test]
fn test_prompt_differs_when_profile_differs() {
    let base = common::sample_profile();
    let heavier = Profile {
        weight_kg: base.weight_kg + 10.0,
        ..base.clone()
    };
    assert_ne!(build_prompt(&base), build_prompt(&heavier));
}

#[test]
fn test_prompt_requests_snake_case_schema() {
    let prompt = build_prompt(&Profile::default());
    for key in [
        "\"daily_calories\"",
        "\"macros\"",
        "\"weekly_workouts\"",
        "\"weekly_meals\"",
        "\"day_name\"",
        "\"duration_minutes\"",
        "\"shopping_list\"",
    ] {
        assert!(prompt.contains(key), "schema is missing {key}");
    }
}
