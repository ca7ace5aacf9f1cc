//! Error taxonomy for conditions a validation run cannot recover from.
//!
//! Everything else (malformed data files, missing clauses, duplicates) is a
//! [`Finding`](crate::finding::Finding), never an error.

use std::path::PathBuf;

/// Unrecoverable gate errors.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("project root not found: {0}")]
    ProjectRootMissing(PathBuf),

    #[error("project root is not a directory: {0}")]
    ProjectRootNotDirectory(PathBuf),

    #[error("invalid config {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
