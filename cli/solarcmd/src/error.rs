//! CLI-specific error types.
//!
//! Errors from the SWIS client itself are carried through `anyhow` by the
//! command handlers; this covers settings and argument problems.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving settings or arguments
#[derive(Debug, Error)]
pub enum CliError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required connection setting was given nowhere
    #[error("missing setting '{0}': pass --{0}, set ORION_{upper}, or add it to the config file", upper = .0.to_uppercase())]
    MissingSetting(&'static str),

    /// A `--param` value is not `key=value`
    #[error("invalid query parameter '{0}': expected key=value")]
    InvalidParam(String),
}
