// ABOUTME: Output formatting helpers for nutristrong-cli
// ABOUTME: Renders drafts and plans as short human-readable summaries or JSON

use nutristrong_server::{
    draft::OnboardingDraft,
    errors::AppResult,
    models::{ComprehensivePlan, Profile},
};
use serde::Serialize;

/// Pretty-print any serializable value as JSON
pub fn display_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "None"
    } else {
        text
    }
}

fn display_profile(profile: &Profile) {
    println!("Profile:");
    println!("   Age: {}", profile.age);
    println!("   Gender: {}", profile.gender);
    println!("   Height: {}cm", profile.height_cm);
    println!("   Weight: {}kg", profile.weight_kg);
    println!("   Goal: {}", profile.goal);
    println!("   Activity: {}", profile.activity_level);
    println!("   Diet: {}", or_none(&profile.dietary_restrictions));
    println!("   Allergies: {}", or_none(&profile.allergies));
}

/// Display a draft and, when present, a one-line plan summary
pub fn display_draft(draft: &OnboardingDraft) {
    println!("{}", "=".repeat(50));
    display_profile(&draft.profile);
    match &draft.plan {
        Some(plan) => println!(
            "Plan: {} kcal/day, {} meal days, {} workout days",
            plan.daily_calories,
            plan.weekly_meals.len(),
            plan.weekly_workouts.len()
        ),
        None => println!("Plan: not generated yet (run `nutristrong-cli generate`)"),
    }
    println!("Updated: {}", draft.updated_at);
}

/// Display a generated plan
pub fn display_plan(plan: &ComprehensivePlan) {
    println!("{}", "=".repeat(80));
    println!("{}", plan.summary);
    println!("{}", "=".repeat(80));
    println!(
        "Daily target: {} kcal | protein {}g | carbs {}g | fats {}g",
        plan.daily_calories,
        plan.macro_target.protein,
        plan.macro_target.carbs,
        plan.macro_target.fats
    );

    for day in &plan.weekly_meals {
        println!("\n{}", day.day_name);
        for (slot, meal) in [
            ("Breakfast", &day.breakfast),
            ("Lunch", &day.lunch),
            ("Dinner", &day.dinner),
            ("Snack", &day.snack),
        ] {
            println!("   {slot:<10} {} ({} kcal)", meal.name, meal.calories);
        }
    }

    if !plan.weekly_workouts.is_empty() {
        println!("\nTraining week:");
        for workout in &plan.weekly_workouts {
            println!(
                "   {:<10} {} - {} min, {} exercises",
                workout.day_name,
                workout.focus,
                workout.duration_minutes,
                workout.exercises.len()
            );
        }
    }

    println!("\nShopping list:");
    for item in &plan.shopping_list {
        println!("   - {item}");
    }
}
