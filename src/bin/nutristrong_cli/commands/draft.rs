// ABOUTME: Draft commands for nutristrong-cli: set, show and clear
// ABOUTME: Field updates are validated with the same lenient rules the HTTP API applies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use clap::Args;
use nutristrong_server::{
    draft::{DraftStore, OnboardingDraft},
    errors::AppResult,
    models::{Profile, ProfileInput},
};

use crate::helpers::display::{display_draft, display_json};

/// Profile fields accepted by `draft set`
#[derive(Debug, Default, Args)]
pub struct DraftFields {
    /// Age in years
    #[arg(long)]
    pub age: Option<f64>,

    /// male, female or other
    #[arg(long)]
    pub gender: Option<String>,

    /// Height in centimetres
    #[arg(long)]
    pub height_cm: Option<f64>,

    /// Weight in kilograms
    #[arg(long)]
    pub weight_kg: Option<f64>,

    /// lose_fat, maintain, gain_muscle or athletic_performance
    #[arg(long)]
    pub goal: Option<String>,

    /// Activity level, e.g. "Sedentary" or "Very Active"
    #[arg(long)]
    pub activity_level: Option<String>,

    /// Comma-separated dietary restrictions
    #[arg(long)]
    pub dietary_restrictions: Option<String>,

    /// Comma-separated allergies
    #[arg(long)]
    pub allergies: Option<String>,
}

impl DraftFields {
    /// Overlay these fields on `current` and validate the result
    pub fn apply(self, current: &Profile) -> AppResult<Profile> {
        ProfileInput {
            age: Some(self.age.unwrap_or_else(|| f64::from(current.age))),
            gender: Some(
                self.gender
                    .unwrap_or_else(|| current.gender.as_str().to_owned()),
            ),
            height_cm: Some(self.height_cm.unwrap_or(current.height_cm)),
            weight_kg: Some(self.weight_kg.unwrap_or(current.weight_kg)),
            goal: Some(self.goal.unwrap_or_else(|| current.goal.as_str().to_owned())),
            activity_level: Some(
                self.activity_level
                    .unwrap_or_else(|| current.activity_level.clone()),
            ),
            dietary_restrictions: Some(
                self.dietary_restrictions
                    .unwrap_or_else(|| current.dietary_restrictions.clone()),
            ),
            allergies: Some(self.allergies.unwrap_or_else(|| current.allergies.clone())),
        }
        .into_profile()
    }
}

/// Create or update the draft; any previously generated plan is dropped
pub async fn set(store: &dyn DraftStore, fields: DraftFields) -> AppResult<()> {
    let current = store
        .get()
        .await?
        .map(|draft| draft.profile)
        .unwrap_or_default();

    let profile = fields.apply(&current)?;
    let draft = OnboardingDraft::new(profile);
    store.set(&draft).await?;

    println!("Draft saved.");
    display_draft(&draft);
    Ok(())
}

/// Print the current draft
pub async fn show(store: &dyn DraftStore, json: bool) -> AppResult<()> {
    match store.get().await? {
        Some(draft) if json => display_json(&draft)?,
        Some(draft) => display_draft(&draft),
        None => println!("No draft yet. Start one with `nutristrong-cli draft set`."),
    }
    Ok(())
}

/// Discard the current draft
pub async fn clear(store: &dyn DraftStore) -> AppResult<()> {
    store.clear().await?;
    println!("Draft cleared.");
    Ok(())
}
