//! Central application state.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use fundus_values::{
    AppStateProvider, HealthStatus, RequestValue, ResponseValue,
};

use crate::orchestrator::AnalysisOrchestrator;
use crate::registry::{ModelRegistry, RegistryConfig, RegistryError};

/// Configuration for AppState initialization.
#[derive(Debug, Clone, Default)]
pub struct AppStateConfig {
    /// Optional TOML stage-weights file; `None` uses built-in defaults.
    pub weights_path: Option<PathBuf>,
}

/// Central application state.
///
/// Holds the shared model registry and the orchestrator; cloning is cheap
/// and every clone observes the same registry.
#[derive(Clone)]
pub struct AppState {
    /// Model registry and readiness gate.
    pub registry: Arc<ModelRegistry>,
    orchestrator: Arc<AnalysisOrchestrator>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State over a fresh, uninitialized registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ModelRegistry::new()))
    }

    /// State over an existing registry (tests, embedders).
    pub fn with_registry(registry: Arc<ModelRegistry>) -> Self {
        let orchestrator = Arc::new(AnalysisOrchestrator::new(registry.clone()));
        Self {
            registry,
            orchestrator,
        }
    }

    /// Run the one-shot model initialization.
    ///
    /// Called once at service start, before traffic is accepted. A load
    /// failure leaves the registry failed: the service keeps running but
    /// reports unhealthy and refuses every analysis request.
    pub fn initialize_models(&self, config: &AppStateConfig) -> Result<(), RegistryError> {
        tracing::info!("loading analysis models");
        let registry_config = RegistryConfig {
            weights_path: config.weights_path.clone(),
        };
        match self.registry.initialize(&registry_config) {
            Ok(()) => {
                tracing::info!("all models loaded, registry ready");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "model loading failed, refusing analysis traffic");
                Err(e)
            }
        }
    }

    /// Current health as reported on the health interface.
    pub fn health(&self) -> (HealthStatus, bool) {
        if self.registry.is_ready() {
            (HealthStatus::Healthy, true)
        } else {
            (HealthStatus::Unhealthy, false)
        }
    }
}

#[async_trait]
impl AppStateProvider for AppState {
    async fn handle_request(&self, request: RequestValue) -> anyhow::Result<ResponseValue> {
        match request {
            RequestValue::Analyze { image, patient } => {
                let orchestrator = self.orchestrator.clone();
                // CPU-bound pipeline run goes to the blocking pool. A caller
                // that disconnects mid-pipeline does not interrupt the task;
                // the in-flight stage completes and the result is discarded
                // with the dropped future.
                let report =
                    tokio::task::spawn_blocking(move || orchestrator.run(&image, patient))
                        .await
                        .map_err(|e| anyhow::anyhow!("analysis task aborted: {e}"))?;

                match report {
                    Ok(report) => {
                        tracing::info!(
                            stage = %report.stage,
                            lesion_count = report.lesion_count,
                            "analysis completed"
                        );
                        Ok(ResponseValue::analysis(report))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "analysis failed");
                        Err(e.into())
                    }
                }
            }
            RequestValue::Health => {
                let (status, models_loaded) = self.health();
                Ok(ResponseValue::health(status, models_loaded))
            }
        }
    }
}
