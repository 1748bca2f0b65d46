//! Error types for fpsmeter operations.

use std::path::PathBuf;

/// All errors that can surface from fpsmeter-core to a host.
///
/// Only construction-time conditions are fatal; everything that can go wrong
/// after the component is running is absorbed internally (the sampler
/// substitutes the sentinel value and keeps going).
#[derive(Debug, thiserror::Error)]
pub enum MeterError {
    #[error("Sample resource unavailable: {path}: {source}")]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Probe failed: {source}")]
    Probe {
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Home directory not found")]
    HomeDirNotFound,
}

/// Convenience type alias for Results using MeterError.
pub type Result<T> = std::result::Result<T, MeterError>;
