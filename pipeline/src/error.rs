//! Pipeline errors.
//!
//! Represents all failure modes of the codec and the inference stages.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by the codec or by an inference stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The uploaded buffer was empty.
    #[error("image buffer is empty")]
    EmptyInput,

    /// The uploaded buffer exceeded the decode size bound.
    #[error("image of {actual} bytes exceeds the {max} byte limit")]
    InputTooLarge {
        /// Size of the rejected buffer.
        actual: usize,
        /// The configured bound.
        max: usize,
    },

    /// The buffer could not be decoded into a valid RGB image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// An image could not be encoded for transport.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// A weights file could not be read.
    #[error("failed to read weights file {path}: {source}")]
    WeightsIo {
        /// Path of the unreadable file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A weights file was readable but its contents are unusable.
    #[error("invalid stage weights: {0}")]
    InvalidWeights(String),

    /// A stage computation failed.
    #[error("inference failed: {0}")]
    Inference(String),
}
