//! Central application state for the fundus analysis server.
//!
//! This crate owns the core of the service:
//!
//! - [`ModelRegistry`]: singleton holder of the four stage instances with a
//!   one-shot `uninitialized → loading → ready | failed` lifecycle and a
//!   lock-free readiness predicate.
//! - [`AnalysisOrchestrator`]: the per-request pipeline (decode, enhance,
//!   segment, classify, explain, assemble) with strict ordering and
//!   fail-fast error propagation.
//! - The response assembler: a pure function merging the stage outputs, the
//!   clinical knowledge table, and the codec into the externally visible
//!   report.
//!
//! [`AppState`] wires these together and implements
//! [`fundus_values::AppStateProvider`] for the transport layer.

pub mod assembler;
pub mod orchestrator;
pub mod registry;
pub mod state;

pub use orchestrator::AnalysisOrchestrator;
pub use registry::{LoadedStages, ModelRegistry, RegistryConfig, RegistryError, RegistryState};
pub use state::{AppState, AppStateConfig};
