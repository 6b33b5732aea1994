//! # Error Types — Structured Error Hierarchy
//!
//! Only configuration problems are errors. Schema malformation degrades to
//! zero contributed paths, and drift findings are ordinary report output,
//! so neither appears here.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for sdrift.
#[derive(Error, Debug)]
pub enum SdriftError {
    /// The run configuration is broken; no report is produced.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error outside of configured inputs.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A declared input cannot be used. Always fatal for the whole run.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configured source or schema file does not exist.
    #[error("file not found: {}", path.display())]
    MissingFile {
        /// Path as resolved against the configuration directory.
        path: PathBuf,
    },

    /// A configured file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// A schema file is not valid JSON or YAML.
    #[error("cannot parse schema {}: {reason}", path.display())]
    InvalidSchema {
        /// Schema file path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The configuration file is malformed or inconsistent.
    #[error("invalid configuration {}: {reason}", path.display())]
    InvalidConfig {
        /// Configuration file path.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// The configuration declares a format version this build does not read.
    #[error("unsupported configuration version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
}

impl ConfigError {
    /// Classify an IO failure on a configured path.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingFile { path }
        } else {
            ConfigError::Unreadable { path, source }
        }
    }
}
