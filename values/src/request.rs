//! Request value types and constructors.
//!
//! Every inbound operation, regardless of transport, is represented as a
//! strongly-typed [`RequestValue`] before it reaches the backend.

use serde::{Deserialize, Serialize};

use crate::types::PatientInfo;

/// Concrete request types handled by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RequestValue {
    /// Analyze a fundus photograph.
    Analyze {
        /// Raw encoded image bytes as uploaded (PNG, JPEG, ...).
        image: Vec<u8>,
        /// Opaque patient passthrough fields.
        #[serde(default)]
        patient: PatientInfo,
    },

    /// Health check: report registry readiness.
    Health,
}

impl RequestValue {
    /// Create an analysis request.
    pub fn analyze(image: Vec<u8>, patient: PatientInfo) -> Self {
        Self::Analyze { image, patient }
    }

    /// Create a health check request.
    pub fn health() -> Self {
        Self::Health
    }

    /// Short name of the request kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Analyze { .. } => "analyze",
            Self::Health => "health",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_request_carries_bytes_and_patient() {
        let request = RequestValue::analyze(
            vec![1, 2, 3],
            PatientInfo::new("Jane Roe", "jane@example.org"),
        );
        match request {
            RequestValue::Analyze { image, patient } => {
                assert_eq!(image, vec![1, 2, 3]);
                assert_eq!(patient.name, "Jane Roe");
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn request_kind_names() {
        assert_eq!(
            RequestValue::analyze(Vec::new(), PatientInfo::default()).kind(),
            "analyze"
        );
        assert_eq!(RequestValue::health().kind(), "health");
    }
}
