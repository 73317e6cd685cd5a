//! Ingestion error types.
//!
//! Every error that comes from a file carries the path it came from, so a
//! failure in a large data directory points at the file to fix.

use std::path::PathBuf;

use thiserror::Error;

use rulekeep_core::{CollectionError, ValidationError};

/// Errors that can occur while reading a ruleset data directory.
#[derive(Debug, Error)]
pub enum PackError {
    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A property list line could not be read.
    #[error("invalid property list at line {line}: {detail}")]
    InvalidPropertyList { line: usize, detail: String },

    /// The loaded values violate a collection invariant.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// A primitive value failed to parse.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ingestion operations.
pub type PackResult<T> = Result<T, PackError>;
