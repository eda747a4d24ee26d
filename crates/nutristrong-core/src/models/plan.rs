// ABOUTME: Weekly plan model: meals, workouts, macro targets and the shopping list
// ABOUTME: Defines the well-known Fallback Plan substituted whenever generation fails
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::lenient;

/// Summary text of the Fallback Plan
pub const FALLBACK_SUMMARY: &str = "AI Service unavailable. Displaying emergency protocol.";
/// Daily calories of the Fallback Plan
pub const FALLBACK_DAILY_CALORIES: u32 = 2500;
/// Macro target of the Fallback Plan
pub const FALLBACK_MACROS: MacroSplit = MacroSplit {
    protein: 180,
    carbs: 250,
    fats: 80,
};
/// Sole shopping list entry of the Fallback Plan
pub const FALLBACK_SHOPPING_ITEM: &str = "System Offline - Please Retry Generation";

/// Protein, carbohydrate and fat grams
///
/// No invariant ties the sum to calories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MacroSplit {
    /// Protein grams
    #[serde(default, deserialize_with = "lenient::non_negative_int")]
    pub protein: u32,
    /// Carbohydrate grams
    #[serde(default, deserialize_with = "lenient::non_negative_int")]
    pub carbs: u32,
    /// Fat grams
    #[serde(default, deserialize_with = "lenient::non_negative_int")]
    pub fats: u32,
}

/// A single meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealItem {
    /// Recipe name
    pub name: String,
    /// Energy in kcal
    #[serde(deserialize_with = "lenient::non_negative_int")]
    pub calories: u32,
    /// Macro breakdown
    #[serde(default)]
    pub macros: MacroSplit,
    /// Ingredients in recipe order
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// The four meals of one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMealPlan {
    /// Weekday label
    pub day_name: String,
    pub breakfast: MealItem,
    pub lunch: MealItem,
    pub dinner: MealItem,
    pub snack: MealItem,
}

/// A single exercise prescription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise name
    pub name: String,
    /// Number of working sets
    #[serde(deserialize_with = "lenient::non_negative_int")]
    pub sets: u32,
    /// Free-form rep scheme such as "3x8" or "8-12"
    #[serde(default, deserialize_with = "lenient::text")]
    pub reps: String,
    /// Form cue
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
}

/// One day of the training split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWorkout {
    /// Weekday label
    pub day_name: String,
    /// Muscle group, or "Rest"
    #[serde(default, deserialize_with = "lenient::text")]
    pub focus: String,
    /// Session length in minutes
    #[serde(default, deserialize_with = "lenient::non_negative_int")]
    pub duration_minutes: u32,
    /// Exercises in session order
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// A full weekly plan: either generated or the [`ComprehensivePlan::fallback`] plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensivePlan {
    /// One-sentence strategy summary
    pub summary: String,
    /// Daily energy target in kcal
    #[serde(deserialize_with = "lenient::non_negative_int")]
    pub daily_calories: u32,
    /// Daily macro target
    pub macro_target: MacroSplit,
    /// Meals per weekday, normally seven entries
    #[serde(default)]
    pub weekly_meals: Vec<DailyMealPlan>,
    /// Workouts per weekday, normally seven entries
    #[serde(default)]
    pub weekly_workouts: Vec<DailyWorkout>,
    /// Consolidated ingredients for the week
    #[serde(default)]
    pub shopping_list: Vec<String>,
}

impl ComprehensivePlan {
    /// The well-known safe plan substituted whenever generation or parsing fails
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_owned(),
            daily_calories: FALLBACK_DAILY_CALORIES,
            macro_target: FALLBACK_MACROS,
            weekly_meals: Vec::new(),
            weekly_workouts: Vec::new(),
            shopping_list: vec![FALLBACK_SHOPPING_ITEM.to_owned()],
        }
    }

    /// Whether this plan is the Fallback Plan
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}
