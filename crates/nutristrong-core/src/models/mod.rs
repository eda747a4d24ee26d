// ABOUTME: Domain models for the plan service: user profile and weekly plan
// ABOUTME: Re-exports the profile, plan and lenient deserialization submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Lenient serde helpers for loosely typed JSON
pub mod lenient;

mod plan;
mod profile;

pub use plan::{
    ComprehensivePlan, DailyMealPlan, DailyWorkout, Exercise, MacroSplit, MealItem,
    FALLBACK_DAILY_CALORIES, FALLBACK_MACROS, FALLBACK_SHOPPING_ITEM, FALLBACK_SUMMARY,
};
pub use profile::{
    Gender, GoalType, Profile, ProfileInput, DEFAULT_ACTIVITY_LEVEL, DEFAULT_AGE,
    DEFAULT_HEIGHT_CM, DEFAULT_WEIGHT_KG,
};
