//! Error types for tm-core

use thiserror::Error;

use crate::migration::Version;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Two migrations declare the same version
    #[error("[E003] Duplicate migration version {version}: '{first}' and '{second}'")]
    DuplicateVersion {
        version: Version,
        first: String,
        second: String,
    },

    /// E004: A migration uses a version reserved for the baseline
    #[error("[E004] Migration '{name}' uses reserved version {version}: versions must be greater than 1")]
    ReservedVersion { version: Version, name: String },

    /// E005: Malformed migration file
    #[error("[E005] Invalid migration file {path}: {reason}")]
    InvalidMigrationFile { path: String, reason: String },

    /// IO error with file path context
    #[error("IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
