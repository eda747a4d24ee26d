// ABOUTME: User profile model: biometric inputs and goal used to generate a weekly plan
// ABOUTME: Includes the lenient ProfileInput accepted at the HTTP boundary with default filling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient;
use crate::errors::{AppError, AppResult};

/// Default age applied when the client omits it
pub const DEFAULT_AGE: u32 = 25;
/// Default height in centimetres applied when the client omits it
pub const DEFAULT_HEIGHT_CM: f64 = 175.0;
/// Default weight in kilograms applied when the client omits it
pub const DEFAULT_WEIGHT_KG: f64 = 75.0;
/// Default activity level applied when the client omits it
pub const DEFAULT_ACTIVITY_LEVEL: &str = "Active";

/// Normalize a display or snake_case label for case-insensitive matching
fn label_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Biological sex used for BMR estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    /// Male
    #[default]
    Male,
    /// Female
    Female,
    /// Other or undisclosed
    Other,
}

impl Gender {
    /// Display form, as rendered in prompts and stored in the profile table
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(raw: &str) -> AppResult<Self> {
        match label_key(raw).as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(AppError::invalid_input(format!(
                "Invalid gender '{raw}': expected Male, Female or Other"
            ))),
        }
    }
}

/// Training goal that drives the calorie target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GoalType {
    /// Caloric deficit
    #[default]
    LoseFat,
    /// Maintenance calories
    Maintain,
    /// Caloric surplus
    GainMuscle,
    /// Performance-oriented fuelling
    AthleticPerformance,
}

impl GoalType {
    /// Display form, as rendered in prompts and stored in the profile table
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoseFat => "Lose Fat",
            Self::Maintain => "Maintain",
            Self::GainMuscle => "Gain Muscle",
            Self::AthleticPerformance => "Athletic Performance",
        }
    }
}

impl FromStr for GoalType {
    type Err = AppError;

    fn from_str(raw: &str) -> AppResult<Self> {
        match label_key(raw).as_str() {
            "lose fat" => Ok(Self::LoseFat),
            "maintain" => Ok(Self::Maintain),
            "gain muscle" => Ok(Self::GainMuscle),
            "athletic performance" => Ok(Self::AthleticPerformance),
            _ => Err(AppError::invalid_input(format!(
                "Invalid goal '{raw}': expected Lose Fat, Maintain, Gain Muscle or Athletic Performance"
            ))),
        }
    }
}

macro_rules! label_serde {
    ($ty:ty) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(|e: AppError| serde::de::Error::custom(e.message))
            }
        }
    };
}

label_serde!(Gender);
label_serde!(GoalType);

/// Normalized biometric and goal inputs for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Age in years
    pub age: u32,
    /// Gender
    pub gender: Gender,
    /// Height in centimetres
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Training goal
    pub goal: GoalType,
    /// Free-form activity level ("Sedentary", "Active", ...)
    pub activity_level: String,
    /// Comma-separated dietary restrictions, possibly empty
    pub dietary_restrictions: String,
    /// Comma-separated allergies, possibly empty
    pub allergies: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            gender: Gender::default(),
            height_cm: DEFAULT_HEIGHT_CM,
            weight_kg: DEFAULT_WEIGHT_KG,
            goal: GoalType::default(),
            activity_level: DEFAULT_ACTIVITY_LEVEL.to_owned(),
            dietary_restrictions: String::new(),
            allergies: String::new(),
        }
    }
}

/// Profile fields as sent by clients: every field optional and loosely typed
///
/// Absent fields are filled from [`Profile::default`] by [`ProfileInput::into_profile`];
/// defaulting is a leniency policy, not a validation failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    /// Age in years
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub age: Option<f64>,
    /// Gender label
    #[serde(default)]
    pub gender: Option<String>,
    /// Height in centimetres
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub weight_kg: Option<f64>,
    /// Goal label
    #[serde(default)]
    pub goal: Option<String>,
    /// Activity level
    #[serde(default)]
    pub activity_level: Option<String>,
    /// Comma-separated dietary restrictions
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
    /// Comma-separated allergies
    #[serde(default)]
    pub allergies: Option<String>,
}

/// Treat blank strings the same as absent ones
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProfileInput {
    /// Fill defaults and validate ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a supplied value is out of range or an
    /// enum label is not recognised.
    pub fn into_profile(self) -> AppResult<Profile> {
        let defaults = Profile::default();

        let age = match self.age {
            None => defaults.age,
            Some(age) if age.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&age) => {
                age.round() as u32
            }
            Some(age) => {
                return Err(AppError::invalid_input(format!(
                    "Invalid age {age}: must be a non-negative number"
                )))
            }
        };
        let height_cm = positive("heightCm", self.height_cm, defaults.height_cm)?;
        let weight_kg = positive("weightKg", self.weight_kg, defaults.weight_kg)?;

        let gender = present(self.gender)
            .map(|g| g.parse())
            .transpose()?
            .unwrap_or(defaults.gender);
        let goal = present(self.goal)
            .map(|g| g.parse())
            .transpose()?
            .unwrap_or(defaults.goal);

        Ok(Profile {
            age,
            gender,
            height_cm,
            weight_kg,
            goal,
            activity_level: present(self.activity_level).unwrap_or(defaults.activity_level),
            dietary_restrictions: self.dietary_restrictions.unwrap_or_default(),
            allergies: self.allergies.unwrap_or_default(),
        })
    }
}

fn positive(field: &str, value: Option<f64>, default: f64) -> AppResult<f64> {
    match value {
        None => Ok(default),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(AppError::invalid_input(format!(
            "Invalid {field} {v}: must be a positive number"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_empty_input_uses_defaults() {
        let profile = ProfileInput::default().into_profile().unwrap();
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.age, 25);
        assert!((profile.height_cm - 175.0).abs() < f64::EPSILON);
        assert!((profile.weight_kg - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_labels_accept_display_and_snake_case() {
        assert_eq!("lose_fat".parse::<GoalType>().unwrap(), GoalType::LoseFat);
        assert_eq!(
            "Athletic Performance".parse::<GoalType>().unwrap(),
            GoalType::AthleticPerformance
        );
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn test_coerces_numeric_strings() {
        let input: ProfileInput = serde_json::from_str(
            r#"{"age": "31", "heightCm": "180.5", "weightKg": 90, "gender": "female",
                "goal": "gain_muscle", "dietaryRestrictions": null}"#,
        )
        .unwrap();
        let profile = input.into_profile().unwrap();
        assert_eq!(profile.age, 31);
        assert!((profile.height_cm - 180.5).abs() < f64::EPSILON);
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.goal, GoalType::GainMuscle);
        assert_eq!(profile.dietary_restrictions, "");
    }

    #[test]
    fn test_rejects_non_positive_height() {
        let input = ProfileInput {
            height_cm: Some(0.0),
            ..ProfileInput::default()
        };
        let error = input.into_profile().unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_profile_serializes_camel_case_with_display_labels() {
        let json = serde_json::to_value(Profile::default()).unwrap();
        assert_eq!(json["heightCm"], 175.0);
        assert_eq!(json["gender"], "Male");
        assert_eq!(json["goal"], "Lose Fat");
        assert_eq!(json["activityLevel"], "Active");
    }
}
