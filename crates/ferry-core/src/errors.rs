//! Cross-cutting error types for ferry.
//!
//! Domain-specific errors (e.g., `CmsError`, `SyncError`) are defined in
//! their respective crates. They converge into `anyhow` in `ferry-cli`.

use thiserror::Error;

/// Errors that can be raised by any ferry crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A raw record had neither a slug nor a title to derive one from.
    #[error("{kind} record {id} has no slug and no derivable title")]
    MissingIdentifier { kind: String, id: String },

    /// An unknown content kind name was supplied.
    #[error("Unknown content kind: {0}")]
    UnknownKind(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
