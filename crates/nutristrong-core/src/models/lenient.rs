// ABOUTME: Lenient serde deserializers for loosely typed client and model JSON
// ABOUTME: Accepts numbers encoded as strings or floats, and nulls where strings are expected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Helpers for `#[serde(deserialize_with = "...")]`.
//!
//! Both the onboarding client and the generative backend are loose about JSON
//! types: ages arrive as `"25"`, calories as `2150.0`, rep schemes as `10`.
//! These helpers accept those encodings and reject anything that cannot be
//! read as the intended type, so a structurally wrong document still fails.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Optional float that may be encoded as a number or a numeric string.
///
/// `null`, absent and blank strings all read as `None`.
///
/// # Errors
///
/// Returns a deserialization error for non-numeric strings, booleans, arrays
/// and objects.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("number out of range")),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, found \"{text}\"")))
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected a number, found {other}"
        ))),
    }
}

/// Non-negative integer that may be encoded as an integer, a float or a numeric string.
///
/// Floats are rounded to the nearest integer.
///
/// # Errors
///
/// Returns a deserialization error for negative or non-finite values and for
/// anything that is not a number.
pub fn non_negative_int<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom(format!("expected a non-negative integer, found {value}")))?;

    if !number.is_finite() || number < 0.0 || number > f64::from(u32::MAX) {
        return Err(D::Error::custom(format!(
            "expected a non-negative integer, found {number}"
        )));
    }
    Ok(number.round() as u32)
}

/// Free-form text that may arrive as a string, a number or `null`.
///
/// # Errors
///
/// Returns a deserialization error for booleans, arrays and objects.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(other) => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}
