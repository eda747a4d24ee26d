// ABOUTME: Renders a Profile into the plan-generation instruction document
// ABOUTME: Pure and deterministic; embeds every profile field and the snake_case output schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompt Builder
//!
//! [`build_prompt`] is a pure function of the [`Profile`]. Values are rendered
//! as given, without clamping. The output schema at the end of the document is
//! the one [`super::normalizer`] parses; both change together.

use crate::models::Profile;

/// Coach persona and training-style preference block
const PERSONA: &str = "\
You are NutriStrong, an advanced AI Fitness Coach Engine specialized in hypertrophy and body recomposition.";

const TRAINING_PREFERENCE: &str = "\
USER TRAINING PREFERENCE (Hypertrophy Style):
- The user prefers high-stimulus, hypertrophy-focused training.
- Example exercises they like: Dumbbell Incline Press (3x8), Pec Deck Fly (3x8), Incline Curls (3x8), Bayesian Curls (3x8), Overhead Extensions (3x8).
- USE THIS STYLE for the generated workouts. Focus on controlled eccentrics, full range of motion, and muscle isolation mixed with compound movements.";

const TASKS: &str = "\
YOUR TASKS:
1. CALCULATION: Calculate BMR and TDEE based on stats. Set daily calorie target for their goal (Deficit for fat loss, Surplus for muscle).
2. MACROS: Set High Protein (approx 2g per kg of bodyweight). Split remaining calories between Carbs and Fats suitable for training fuel.
3. MEAL PLAN (7 DAYS):
   - Generate a UNIQUE meal plan for Monday through Sunday.
   - DO NOT REPEAT MEALS. Every day must have different recipes to prevent boredom.
   - 4 meals per day: Breakfast, Lunch, Dinner, Snack.
4. WORKOUT PLAN (5-DAY SPLIT):
   - Schedule: Monday (Push), Tuesday (Pull), Wednesday (Legs), Thursday (Upper Body), Friday (Lower Body), Saturday (Rest), Sunday (Rest).
   - Volume: 5-7 exercises per workout.
   - Rep Ranges: 8-12 for hypertrophy, 12-15 for isolation.
5. SHOPPING LIST: Consolidate ingredients for the generated meals.";

/// Output schema; the keys here are exactly the ones the normalizer reads
pub const OUTPUT_SCHEMA: &str = r#"OUTPUT FORMAT (Strict JSON only: no markdown, no code fences, no text before or after the object):
{
  "summary": "Short 1-sentence analysis of the plan strategy.",
  "daily_calories": Number,
  "macros": { "protein": Number, "carbs": Number, "fats": Number },
  "weekly_workouts": [
    {
      "day_name": "Monday",
      "focus": "Push (Chest/Shoulders/Triceps)",
      "duration_minutes": 75,
      "exercises": [
        { "name": "Exercise Name", "sets": Number, "reps": "String (e.g. 3x8)", "description": "Form cue" }
      ]
    }
    ... (Repeat for Tue-Sun)
  ],
  "weekly_meals": [
    {
      "day_name": "Monday",
      "breakfast": { "name": "Meal Name", "calories": Number, "macros": {"protein": 0, "carbs": 0, "fats": 0}, "ingredients": ["Item 1", "Item 2"] },
      "lunch": { ... },
      "dinner": { ... },
      "snack": { ... }
    }
    ... (Repeat for Tue-Sun with UNIQUE meals)
  ],
  "shopping_list": ["Item 1", "Item 2", ...]
}"#;

/// Render an empty free-text constraint as "None"
fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "None"
    } else {
        value
    }
}

/// Render the full plan-generation prompt for a profile
#[must_use]
pub fn build_prompt(profile: &Profile) -> String {
    let user_profile = format!(
        "USER PROFILE:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Height: {height}cm\n\
         - Weight: {weight}kg\n\
         - Goal: {goal} (Adjust calories/macros accordingly)\n\
         - Activity: {activity}\n\
         - Diet Constraints: {diet}\n\
         - Allergies: {allergies}",
        age = profile.age,
        gender = profile.gender,
        height = profile.height_cm,
        weight = profile.weight_kg,
        goal = profile.goal,
        activity = profile.activity_level,
        diet = or_none(&profile.dietary_restrictions),
        allergies = or_none(&profile.allergies),
    );

    [PERSONA, user_profile.as_str(), TRAINING_PREFERENCE, TASKS, OUTPUT_SCHEMA].join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, GoalType};

    #[test]
    fn test_fractional_measurements_render_verbatim() {
        let profile = Profile {
            height_cm: 180.5,
            weight_kg: 82.25,
            ..Profile::default()
        };
        let prompt = build_prompt(&profile);
        assert!(prompt.contains("- Height: 180.5cm"));
        assert!(prompt.contains("- Weight: 82.25kg"));
    }

    #[test]
    fn test_whole_measurements_render_without_decimals() {
        let prompt = build_prompt(&Profile::default());
        assert!(prompt.contains("- Height: 175cm"));
        assert!(prompt.contains("- Weight: 75kg"));
    }

    #[test]
    fn test_empty_constraints_render_as_none() {
        let prompt = build_prompt(&Profile::default());
        assert!(prompt.contains("- Diet Constraints: None"));
        assert!(prompt.contains("- Allergies: None"));
    }

    #[test]
    fn test_labels_render_in_display_form() {
        let profile = Profile {
            gender: Gender::Female,
            goal: GoalType::AthleticPerformance,
            ..Profile::default()
        };
        let prompt = build_prompt(&profile);
        assert!(prompt.contains("- Gender: Female"));
        assert!(prompt.contains("- Goal: Athletic Performance"));
    }
}
