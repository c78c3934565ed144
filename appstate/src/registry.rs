//! Model registry and readiness gate.
//!
//! Owns one instance of each stage capability, loaded exactly once at
//! startup. The lifecycle is `Uninitialized → Loading → Ready | Failed`;
//! `Ready` and `Failed` are terminal. There is no reload or hot-swap path;
//! replacing a model requires a full process restart.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use fundus_pipeline::{
    Classify, Enhance, Explain, LesionSegmenter, PipelineError, RetinexEnhancer,
    SaliencyExplainer, Segment, SeverityClassifier, StageWeights,
};
use fundus_values::{AnalysisError, AnalysisResult};

/// Registry lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegistryState {
    /// `initialize` has not been called.
    Uninitialized = 0,
    /// `initialize` is constructing and loading the stages.
    Loading = 1,
    /// All four stages loaded; instances are immutable and shared read-only.
    Ready = 2,
    /// A stage failed to load. Terminal: all pipeline execution is refused.
    Failed = 3,
}

impl RegistryState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Uninitialized,
            1 => Self::Loading,
            2 => Self::Ready,
            _ => Self::Failed,
        }
    }
}

/// Errors of registry initialization itself.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// `initialize` was called a second time. The registry loads exactly
    /// once per process, whatever the outcome of the first attempt.
    #[error("model registry is already initialized (state: {state:?})")]
    AlreadyInitialized {
        /// State observed at the rejected call.
        state: RegistryState,
    },

    /// Stage construction or weight loading failed. The registry is left in
    /// the terminal `Failed` state.
    #[error("model loading failed: {source}")]
    LoadFailed {
        /// The underlying pipeline error.
        #[from]
        source: PipelineError,
    },
}

/// Configuration for registry initialization.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Optional TOML stage-weights file. `None` uses built-in defaults.
    pub weights_path: Option<PathBuf>,
}

/// The four loaded stage instances.
///
/// Behind `Arc` so the registry can hand them to concurrently running
/// requests; every trait requires `Send + Sync` and `&self`-only inference.
#[derive(Clone)]
pub struct LoadedStages {
    /// Contrast enhancement.
    pub enhancer: Arc<dyn Enhance>,
    /// Lesion segmentation.
    pub segmenter: Arc<dyn Segment>,
    /// Severity classification.
    pub classifier: Arc<dyn Classify>,
    /// Explanation heatmap generation.
    pub explainer: Arc<dyn Explain>,
}

impl LoadedStages {
    fn from_weights(weights: &StageWeights) -> Self {
        Self {
            enhancer: Arc::new(RetinexEnhancer::new(&weights.enhancer)),
            segmenter: Arc::new(LesionSegmenter::new(&weights.segmenter)),
            classifier: Arc::new(SeverityClassifier::new(&weights.classifier)),
            explainer: Arc::new(SaliencyExplainer::new(&weights.explainer)),
        }
    }
}

/// Process-wide singleton holding the stage instances and their lifecycle.
pub struct ModelRegistry {
    state: AtomicU8,
    stages: OnceLock<LoadedStages>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    /// A registry in the `Uninitialized` state.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(RegistryState::Uninitialized as u8),
            stages: OnceLock::new(),
        }
    }

    /// A registry that is immediately `Ready` with the given stages.
    ///
    /// Bypasses weight loading; used by tests and embedders that construct
    /// their own stage implementations.
    pub fn from_stages(stages: LoadedStages) -> Self {
        let registry = Self::new();
        registry
            .stages
            .set(stages)
            .unwrap_or_else(|_| unreachable!("fresh OnceLock"));
        registry
            .state
            .store(RegistryState::Ready as u8, Ordering::Release);
        registry
    }

    /// Construct and load all four stages, exactly once.
    ///
    /// Any failure leaves the registry in the terminal `Failed` state and
    /// all subsequent pipeline execution is refused; a missing explainer
    /// must not silently skip explanation. A second call is rejected without
    /// reloading, whatever the first attempt's outcome.
    pub fn initialize(&self, config: &RegistryConfig) -> Result<(), RegistryError> {
        // Single initialization barrier.
        if let Err(current) = self.state.compare_exchange(
            RegistryState::Uninitialized as u8,
            RegistryState::Loading as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            return Err(RegistryError::AlreadyInitialized {
                state: RegistryState::from_u8(current),
            });
        }

        match self.load(config) {
            Ok(stages) => {
                self.stages
                    .set(stages)
                    .unwrap_or_else(|_| unreachable!("guarded by the initialization barrier"));
                self.state
                    .store(RegistryState::Ready as u8, Ordering::Release);
                Ok(())
            }
            Err(source) => {
                self.state
                    .store(RegistryState::Failed as u8, Ordering::Release);
                Err(RegistryError::LoadFailed { source })
            }
        }
    }

    fn load(&self, config: &RegistryConfig) -> Result<LoadedStages, PipelineError> {
        let weights = match &config.weights_path {
            Some(path) => StageWeights::load(path)?,
            None => StageWeights::default(),
        };
        weights.validate()?;
        Ok(LoadedStages::from_weights(&weights))
    }

    /// Lock-free readiness predicate.
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == RegistryState::Ready as u8
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RegistryState {
        RegistryState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// The loaded stages; the only access path to model instances.
    ///
    /// Fails with [`AnalysisError::NotReady`] unless the registry is `Ready`.
    pub fn stages(&self) -> AnalysisResult<&LoadedStages> {
        if !self.is_ready() {
            return Err(AnalysisError::NotReady);
        }
        self.stages.get().ok_or(AnalysisError::NotReady)
    }
}
