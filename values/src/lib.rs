//! # Fundus Values
//!
//! Unified value system for the fundus analysis server, providing type-safe
//! request/response handling shared by the backend and the API layer.
//!
//! This crate is the bottom of the dependency graph. It owns:
//! - The diabetic-retinopathy severity scale ([`DrStage`]) and the pipeline
//!   stage names ([`StageKind`]).
//! - The clinical knowledge table ([`knowledge`]): the static mapping from
//!   severity stage to description and recommendations.
//! - The request/response value enums exchanged between transports and the
//!   backend ([`RequestValue`], [`ResponseValue`]).
//! - The analysis error taxonomy ([`AnalysisError`]) that every layer above
//!   maps from.
//! - The [`AppStateProvider`] trait the backend implements and the API layer
//!   consumes.

pub mod backend;
pub mod error;
pub mod knowledge;
pub mod request;
pub mod response;
pub mod types;

// Re-exports for convenience
pub use backend::AppStateProvider;
pub use error::{AnalysisError, AnalysisResult};
pub use knowledge::{lookup, StageGuidance};
pub use request::RequestValue;
pub use response::{AnalysisReport, HealthStatus, ImageArtifacts, ResponseValue};
pub use types::{DrStage, PatientInfo, StageKind};
