// ABOUTME: NutriStrong CLI - onboarding draft management and local plan generation
// ABOUTME: Keeps a profile-in-progress on disk and runs the plan generator against it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Start or update the onboarding draft
//! nutristrong-cli draft set --age 31 --gender female --height-cm 168 --weight-kg 62 --goal gain_muscle
//!
//! # Show the current draft (and its plan, if generated)
//! nutristrong-cli draft show
//!
//! # Generate a plan for the drafted profile and keep it in the draft
//! GEMINI_API_KEY=... nutristrong-cli generate
//!
//! # Throw the draft away
//! nutristrong-cli draft clear
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nutristrong_server::constants::plans::MAX_GENERATION_TIMEOUT_SECS;
use nutristrong_server::draft::FileDraftStore;
use nutristrong_server::logging::LoggingConfig;

use commands::draft::DraftFields;

#[derive(Parser)]
#[command(
    name = "nutristrong-cli",
    about = "NutriStrong onboarding CLI",
    long_about = "Build a profile draft step by step and generate a weekly diet and training plan for it."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Draft file override (defaults to the platform data directory)
    #[arg(long, global = true)]
    draft_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Onboarding draft commands
    Draft {
        #[command(subcommand)]
        action: DraftCommand,
    },

    /// Generate a plan for the drafted profile and store it in the draft
    Generate {
        /// Model identifier override
        #[arg(long)]
        model: Option<String>,

        /// Upper bound on the generation call in seconds (default: PLAN_GENERATION_TIMEOUT_SECS or 60)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_GENERATION_TIMEOUT_SECS))]
        timeout_secs: Option<u64>,

        /// Print the plan as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum DraftCommand {
    /// Create or update the draft; unspecified fields keep their current value
    Set(DraftFields),

    /// Show the current draft
    Show {
        /// Print the draft as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discard the current draft
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose).init()?;

    let store = match cli.draft_file {
        Some(path) => FileDraftStore::new(path),
        None => FileDraftStore::default_location()?,
    };

    match cli.command {
        Command::Draft { action } => match action {
            DraftCommand::Set(fields) => commands::draft::set(&store, fields).await?,
            DraftCommand::Show { json } => commands::draft::show(&store, json).await?,
            DraftCommand::Clear => commands::draft::clear(&store).await?,
        },
        Command::Generate {
            model,
            timeout_secs,
            json,
        } => commands::generate::run(&store, model, timeout_secs, json).await?,
    }

    Ok(())
}
