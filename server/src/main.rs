//! Fundus analysis server - diabetic-retinopathy grading over HTTP.
//!
//! Startup order: tracing, configuration, one-shot model initialization,
//! HTTP server. A model load failure does not abort the process: the service
//! keeps running, reports unhealthy on `/health`, and refuses every analysis
//! request with a distinct "service not ready" error until restarted.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;

use appstate::{AppState, AppStateConfig};
use fundus_api::{ApiConfig, SharedState};

use crate::config::{CliArgs, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fundus_server=info,fundus_api=info,appstate=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = ServerConfig::resolve(args)?;

    info!("Starting fundus analysis server v{}", env!("CARGO_PKG_VERSION"));
    info!("Port: {}", config.port);
    match &config.weights_path {
        Some(path) => info!("Stage weights: {}", path.display()),
        None => info!("Stage weights: built-in defaults"),
    }

    // One-shot model initialization. Failure is terminal for analysis
    // traffic but not for the process: the health interface must be able to
    // report the failed state.
    let state = AppState::new();
    if let Err(e) = state.initialize_models(&AppStateConfig {
        weights_path: config.weights_path.clone(),
    }) {
        error!(error = %e, "model initialization failed; serving unhealthy until restart");
    }

    let shared = Arc::new(state) as SharedState;
    let api_config = ApiConfig {
        port: config.port,
        cors_origins: config.cors_origins,
        enable_swagger: config.enable_swagger,
        ..Default::default()
    };

    fundus_api::run_server_with_config(shared, api_config).await
}
