//! The analysis error taxonomy.
//!
//! The backend returns these typed errors instead of generic `anyhow::Error`
//! so the API layer can map each failure class to a distinct HTTP status and
//! clients can branch on the class rather than on message text.

use thiserror::Error;

use crate::types::StageKind;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failure classes of the analysis pipeline.
///
/// The taxonomy is deliberately small; every failure a caller can observe is
/// one of these four kinds.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The model registry has not reached the ready state (still loading, or
    /// permanently failed). Fatal for the request; a caller may retry later.
    #[error("analysis service is not ready: models are not loaded")]
    NotReady,

    /// The uploaded buffer could not be decoded into a valid image.
    /// Not retried; no pipeline stage is ever invoked.
    #[error("invalid input image: {reason}")]
    InvalidInput {
        /// What made the input undecodable.
        reason: String,
    },

    /// A pipeline stage failed. The orchestrator aborts the remaining stages
    /// and reports the failing stage together with the underlying cause; it
    /// never skips a stage and continues.
    #[error("{stage} stage failed: {source}")]
    StageFailure {
        /// Which stage raised the error.
        stage: StageKind,
        /// The underlying stage error, propagated unchanged.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Response assembly violated an internal invariant. Where possible the
    /// assembler degrades to a safe default instead; this variant surfaces
    /// the cases where it cannot (e.g. an image failed to encode).
    #[error("response assembly failed: {reason}")]
    Assembly {
        /// What went wrong while assembling the report.
        reason: String,
    },
}

impl AnalysisError {
    /// Wrap a stage error with its stage context.
    pub fn stage(
        stage: StageKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::StageFailure {
            stage,
            source: Box::new(source),
        }
    }

    /// Build an invalid-input error from any displayable reason.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Build an assembly error from any displayable reason.
    pub fn assembly(reason: impl Into<String>) -> Self {
        Self::Assembly {
            reason: reason.into(),
        }
    }

    /// Which stage failed, if this is a stage failure.
    pub fn failed_stage(&self) -> Option<StageKind> {
        match self {
            Self::StageFailure { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("weights produced NaN activations")]
    struct FakeStageError;

    #[test]
    fn stage_failure_names_the_stage_and_cause() {
        let err = AnalysisError::stage(StageKind::Segment, FakeStageError);
        let message = err.to_string();
        assert!(message.contains("segment"));
        assert_eq!(err.failed_stage(), Some(StageKind::Segment));

        let source = std::error::Error::source(&err).expect("source preserved");
        assert!(source.to_string().contains("NaN"));
    }

    #[test]
    fn non_stage_errors_have_no_stage() {
        assert_eq!(AnalysisError::NotReady.failed_stage(), None);
        assert_eq!(
            AnalysisError::invalid_input("empty buffer").failed_stage(),
            None
        );
    }
}
