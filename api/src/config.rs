//! API configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Port to bind the HTTP server to.
    ///
    /// Default: 8000
    pub port: u16,

    /// Enable Cross-Origin Resource Sharing (CORS).
    ///
    /// Default: true
    pub enable_cors: bool,

    /// Allowed origins for CORS requests.
    ///
    /// Use `["*"]` to allow all origins (development only).
    ///
    /// Default: `["*"]`
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    ///
    /// Sized for base64-wrapped image uploads; requests above the limit are
    /// rejected before the handler runs.
    ///
    /// Default: 32 MiB
    pub max_body_bytes: usize,

    /// Enable Swagger UI documentation at `/swagger-ui/`.
    ///
    /// Default: true
    pub enable_swagger: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            max_body_bytes: 32 * 1024 * 1024,
            enable_swagger: true,
        }
    }
}

impl ApiConfig {
    /// Stricter defaults for production: CORS restricted to the given
    /// origins, Swagger UI disabled.
    pub fn production(allowed_origins: Vec<String>) -> Self {
        Self {
            enable_swagger: false,
            cors_origins: allowed_origins,
            ..Default::default()
        }
    }

    /// Permissive defaults for local development.
    pub fn development() -> Self {
        Self {
            cors_origins: vec!["*".to_string()],
            enable_swagger: true,
            ..Default::default()
        }
    }
}
