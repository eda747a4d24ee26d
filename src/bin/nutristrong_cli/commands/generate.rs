// ABOUTME: Plan generation command for nutristrong-cli
// ABOUTME: Runs the plan generator on the drafted profile and stores the plan in the draft

use std::time::Duration;

use anyhow::Result;
use nutristrong_server::{
    config::LlmConfig,
    draft::{DraftStore, OnboardingDraft},
    models::Profile,
    plans::{GenerationOutcome, PlanGenerator},
};
use tracing::{debug, warn};

use crate::helpers::display::{display_json, display_plan};

/// Generate a plan for the draft and keep it there
///
/// Backend settings come from the same environment variables the server
/// reads; `model` and `timeout_secs` override them.
pub async fn run(
    store: &dyn DraftStore,
    model: Option<String>,
    timeout_secs: Option<u64>,
    json: bool,
) -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {e}");
    }

    let mut draft = match store.get().await? {
        Some(draft) => draft,
        None => {
            warn!("No draft found; generating for the default profile");
            OnboardingDraft::new(Profile::default())
        }
    };

    let mut llm = LlmConfig::from_env()?;
    if let Some(model) = model {
        llm.model = model;
    }
    if let Some(secs) = timeout_secs {
        llm.timeout = Duration::from_secs(secs);
    }
    let generator = PlanGenerator::from_config(&llm)?;

    let generation = generator.generate_with_outcome(&draft.profile).await;
    if let GenerationOutcome::Degraded { reason } = &generation.outcome {
        eprintln!("Generation failed ({reason}); showing the fallback plan.");
    }

    draft.plan = Some(generation.plan);
    draft.updated_at = chrono::Utc::now().to_rfc3339();
    store.set(&draft).await?;

    if let Some(plan) = &draft.plan {
        if json {
            display_json(plan)?;
        } else {
            display_plan(plan);
        }
    }
    Ok(())
}
