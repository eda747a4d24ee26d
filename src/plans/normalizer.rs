// ABOUTME: Parses the generative backend's raw text into a ComprehensivePlan
// ABOUTME: Strips code fences, maps snake_case keys to the plan model, falls back on any failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Normalizer
//!
//! The single parsing boundary for generated plans. The raw document is
//! untrusted: it is either read completely into a [`ComprehensivePlan`] or
//! replaced by [`ComprehensivePlan::fallback`]. Nothing partially parsed
//! escapes this module.
//!
//! Key mapping:
//!
//! | generated | plan |
//! |---|---|
//! | `daily_calories` | `dailyCalories` |
//! | `macros` | `macroTarget` |
//! | `weekly_meals[].day_name` | `weeklyMeals[].dayName` |
//! | `weekly_workouts[].day_name` | `weeklyWorkouts[].dayName` |
//! | `weekly_workouts[].duration_minutes` | `weeklyWorkouts[].durationMinutes` |
//! | `shopping_list` | `shoppingList` |
//!
//! `summary`, `daily_calories` and `macros` are required. The three arrays
//! default to empty when absent or `null`.

use serde::Deserialize;
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::models::lenient;
use crate::models::{
    ComprehensivePlan, DailyMealPlan, DailyWorkout, Exercise, MacroSplit, MealItem,
};

#[derive(Debug, Deserialize)]
struct RawPlan {
    summary: String,
    #[serde(deserialize_with = "lenient::non_negative_int")]
    daily_calories: u32,
    macros: MacroSplit,
    #[serde(default)]
    weekly_meals: Option<Vec<RawDailyMeals>>,
    #[serde(default)]
    weekly_workouts: Option<Vec<RawDailyWorkout>>,
    #[serde(default)]
    shopping_list: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawDailyMeals {
    day_name: String,
    breakfast: MealItem,
    lunch: MealItem,
    dinner: MealItem,
    snack: MealItem,
}

#[derive(Debug, Deserialize)]
struct RawDailyWorkout {
    day_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    focus: String,
    #[serde(default, deserialize_with = "lenient::non_negative_int")]
    duration_minutes: u32,
    #[serde(default)]
    exercises: Option<Vec<Exercise>>,
}

impl From<RawDailyMeals> for DailyMealPlan {
    fn from(raw: RawDailyMeals) -> Self {
        Self {
            day_name: raw.day_name,
            breakfast: raw.breakfast,
            lunch: raw.lunch,
            dinner: raw.dinner,
            snack: raw.snack,
        }
    }
}

impl From<RawDailyWorkout> for DailyWorkout {
    fn from(raw: RawDailyWorkout) -> Self {
        Self {
            day_name: raw.day_name,
            focus: raw.focus,
            duration_minutes: raw.duration_minutes,
            exercises: raw.exercises.unwrap_or_default(),
        }
    }
}

impl From<RawPlan> for ComprehensivePlan {
    fn from(raw: RawPlan) -> Self {
        Self {
            summary: raw.summary,
            daily_calories: raw.daily_calories,
            macro_target: raw.macros,
            weekly_meals: raw
                .weekly_meals
                .unwrap_or_default()
                .into_iter()
                .map(DailyMealPlan::from)
                .collect(),
            weekly_workouts: raw
                .weekly_workouts
                .unwrap_or_default()
                .into_iter()
                .map(DailyWorkout::from)
                .collect(),
            shopping_list: raw.shopping_list.unwrap_or_default(),
        }
    }
}

/// Remove a surrounding Markdown code fence, with or without a language tag
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = strip_language_tag(after_open).trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Drop the language tag after an opening fence. A `json` tag may share its
/// line with the document; any other tag is dropped only when it stands alone.
fn strip_language_tag(after_open: &str) -> &str {
    let tag_len = after_open
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_open.len());
    let (tag, rest) = after_open.split_at(tag_len);

    let bare_line = rest
        .trim_start_matches([' ', '\t'])
        .starts_with(['\n', '\r']);
    if tag.eq_ignore_ascii_case("json") || (!tag.is_empty() && bare_line) {
        rest
    } else {
        after_open
    }
}

/// Parse raw generated text into a plan, reporting why it could not be read
///
/// # Errors
///
/// Returns `SerializationError` when the text is not JSON or does not match the
/// output schema.
pub fn try_normalize(raw: &str) -> AppResult<ComprehensivePlan> {
    let json = strip_code_fence(raw);
    if json.is_empty() {
        return Err(AppError::serialization("Generated plan is empty"));
    }
    let parsed: RawPlan = serde_json::from_str(json)?;
    Ok(parsed.into())
}

/// Parse raw generated text into a plan, substituting the Fallback Plan on any failure
#[must_use]
pub fn normalize(raw: &str) -> ComprehensivePlan {
    try_normalize(raw).unwrap_or_else(|error| {
        warn!(error = %error, "Generated plan unreadable, using fallback plan");
        ComprehensivePlan::fallback()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fence_with_language_tag() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_with_tag_on_document_line() {
        assert_eq!(strip_code_fence("```json{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```JSON {\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\r\n[1]\r\n```"), "[1]");
    }

    #[test]
    fn test_strip_fence_with_other_bare_tag() {
        assert_eq!(strip_code_fence("```jsonc\n{}\n```"), "{}");
    }

    #[test]
    fn test_strip_fence_without_language_tag() {
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
    }

    #[test]
    fn test_unfenced_text_is_trimmed_only() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_missing_closing_fence_keeps_body() {
        assert_eq!(strip_code_fence("```json\n{}"), "{}");
    }

    #[test]
    fn test_empty_text_is_an_error() {
        assert!(try_normalize("   ").is_err());
        assert!(normalize("").is_fallback());
    }
}
