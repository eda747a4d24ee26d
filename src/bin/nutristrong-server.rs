// ABOUTME: Server binary for the NutriStrong plan API
// ABOUTME: Loads configuration from the environment, initialises logging and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # NutriStrong API Server Binary
//!
//! Starts the HTTP API: plan generation, profile and plan persistence, meal and
//! workout days, and progress logging.

use anyhow::Result;
use clap::Parser;
use nutristrong_server::{config::ServerConfig, logging, server};
use tracing::info;

#[derive(Parser)]
#[command(name = "nutristrong-server")]
#[command(about = "NutriStrong API - personalised weekly diet and training plans")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    logging::init_from_env()?;

    info!(
        environment = ?config.environment,
        model = %config.llm.model,
        "Starting NutriStrong API"
    );

    server::run(config).await
}
