//! Configuration system for the fundus analysis server.
//!
//! Sources, highest priority first:
//! - CLI arguments
//! - Environment variables (`FUNDUS_*`)
//! - TOML config file
//! - Defaults

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;

/// Default HTTP port when neither CLI, env, nor file provide one.
const DEFAULT_PORT: u16 = 8000;

/// Command-line arguments for the fundus analysis server.
#[derive(Parser, Debug, Clone)]
#[command(name = "fundus-server")]
#[command(about = "Fundus analysis server - diabetic-retinopathy grading HTTP API")]
#[command(version)]
pub struct CliArgs {
    /// HTTP port for the API server
    #[arg(long, short = 'p', env = "FUNDUS_PORT")]
    pub port: Option<u16>,

    /// Configuration file path
    #[arg(long, short = 'c', default_value = "fundus.toml", env = "FUNDUS_CONFIG")]
    pub config: PathBuf,

    /// Stage weights file (built-in defaults when omitted)
    #[arg(long, env = "FUNDUS_WEIGHTS")]
    pub weights: Option<PathBuf>,

    /// Allowed CORS origins, comma separated ("*" allows any)
    #[arg(long, env = "FUNDUS_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Disable the Swagger UI
    #[arg(long, env = "FUNDUS_DISABLE_SWAGGER")]
    pub disable_swagger: bool,
}

/// Optional overrides from the TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// HTTP port.
    pub port: Option<u16>,
    /// Stage weights file.
    pub weights: Option<PathBuf>,
    /// Allowed CORS origins.
    pub cors_origins: Option<Vec<String>>,
    /// Whether the Swagger UI is served.
    pub enable_swagger: Option<bool>,
}

impl FileConfig {
    /// Load the file if it exists; a missing file is simply empty overrides.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ServerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port.
    pub port: u16,
    /// Stage weights file; `None` uses built-in defaults.
    pub weights_path: Option<PathBuf>,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Whether the Swagger UI is served.
    pub enable_swagger: bool,
}

impl ServerConfig {
    /// Merge CLI arguments (with their env fallbacks) over the config file
    /// over the defaults.
    pub fn resolve(args: CliArgs) -> Result<Self, ServerError> {
        let file = FileConfig::load(&args.config)?;
        Ok(Self {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            weights_path: args.weights.or(file.weights),
            cors_origins: args
                .cors_origins
                .or(file.cors_origins)
                .unwrap_or_else(|| vec!["*".to_string()]),
            enable_swagger: if args.disable_swagger {
                false
            } else {
                file.enable_swagger.unwrap_or(true)
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args_with_config(path: &Path) -> CliArgs {
        CliArgs {
            port: None,
            config: path.to_path_buf(),
            weights: None,
            cors_origins: None,
            disable_swagger: false,
        }
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            ServerConfig::resolve(args_with_config(Path::new("/nonexistent/fundus.toml")))
                .expect("resolve");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert!(config.enable_swagger);
        assert!(config.weights_path.is_none());
    }

    #[test]
    fn file_values_apply_when_cli_is_silent() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "port = 9100\ncors_origins = [\"https://clinic.example\"]\nenable_swagger = false"
        )
        .expect("write");

        let config = ServerConfig::resolve(args_with_config(file.path())).expect("resolve");
        assert_eq!(config.port, 9100);
        assert_eq!(config.cors_origins, vec!["https://clinic.example".to_string()]);
        assert!(!config.enable_swagger);
    }

    #[test]
    fn cli_values_win_over_the_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "port = 9100").expect("write");

        let mut args = args_with_config(file.path());
        args.port = Some(9200);
        args.disable_swagger = true;

        let config = ServerConfig::resolve(args).expect("resolve");
        assert_eq!(config.port, 9200);
        assert!(!config.enable_swagger);
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "port = \"not a number\"").expect("write");
        let err = ServerConfig::resolve(args_with_config(file.path())).expect_err("must fail");
        assert!(matches!(err, ServerError::ConfigParse { .. }));
    }
}
