// ABOUTME: The single bidirectional mapping between Profile and its storage row
// ABOUTME: Used by both the save path and the read path so the two directions cannot drift

//! Profile ↔ storage mapping table:
//!
//! | Profile | storage |
//! |---|---|
//! | `age` | `age` |
//! | `gender` | `gender` (display form) |
//! | `heightCm` | `height` |
//! | `weightKg` | `weight` |
//! | `goal` | `goal` (display form) |
//! | `activityLevel` | `activity_level` |
//! | `dietaryRestrictions` | `diet_preferences` (split on `,`, joined with `", "`) |
//! | `allergies` | `allergies` (split on `,`, joined with `", "`) |

use serde::Serialize;

use super::{now_rfc3339, StoredProfile};
use crate::errors::{AppError, AppResult};
use crate::models::{ComprehensivePlan, Profile};

/// Separator used when re-joining stored lists
const LIST_SEPARATOR: &str = ", ";

/// Profile fields plus the embedded plan, as returned by the profile read path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileWithPlan {
    /// Profile fields, flattened into the same object
    #[serde(flatten)]
    pub profile: Profile,
    /// Latest saved plan, if any
    pub plan_json: Option<ComprehensivePlan>,
}

/// Split comma-separated free text into trimmed, non-empty items
#[must_use]
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join stored items back into comma-separated free text
#[must_use]
pub fn join_list(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// Build the storage row for an identity's profile and plan
#[must_use]
pub fn profile_to_record(
    id: &str,
    profile: &Profile,
    plan: Option<ComprehensivePlan>,
) -> StoredProfile {
    StoredProfile {
        id: id.to_owned(),
        age: profile.age,
        gender: profile.gender.as_str().to_owned(),
        height: profile.height_cm,
        weight: profile.weight_kg,
        goal: profile.goal.as_str().to_owned(),
        activity_level: profile.activity_level.clone(),
        diet_preferences: split_list(&profile.dietary_restrictions),
        allergies: split_list(&profile.allergies),
        plan_json: plan,
        updated_at: now_rfc3339(),
    }
}

/// Read a storage row back into a Profile and its plan
///
/// # Errors
///
/// Returns `DatabaseError` if a stored gender or goal label is not recognised
pub fn record_to_profile(record: StoredProfile) -> AppResult<ProfileWithPlan> {
    let corrupt = |field: &str, e: AppError| {
        AppError::database(format!(
            "Stored {field} for profile {} is invalid: {}",
            record.id, e.message
        ))
    };

    let profile = Profile {
        age: record.age,
        gender: record.gender.parse().map_err(|e| corrupt("gender", e))?,
        height_cm: record.height,
        weight_kg: record.weight,
        goal: record.goal.parse().map_err(|e| corrupt("goal", e))?,
        activity_level: record.activity_level,
        dietary_restrictions: join_list(&record.diet_preferences),
        allergies: join_list(&record.allergies),
    };

    Ok(ProfileWithPlan {
        profile,
        plan_json: record.plan_json,
    })
}
