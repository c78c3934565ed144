//! Server startup errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving the server configuration.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The configuration file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        /// Path of the unreadable file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        /// Path of the invalid file.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}
