//! Error types for audit capture and storage.

use thiserror::Error;

/// Failures raised while persisting or reading back audit entries.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The backing store rejected the operation.
    #[error("audit storage failed: {0}")]
    Storage(String),

    /// An entry payload could not be serialized or deserialized.
    #[error("audit serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the audit engine.
pub type Result<T> = std::result::Result<T, AuditError>;
