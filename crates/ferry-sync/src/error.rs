//! Sync error types.

use ferry_cms::CmsError;
use ferry_core::CoreError;
use thiserror::Error;

/// Errors raised by the sync passes.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A CMS call failed (after retries, when transient).
    #[error(transparent)]
    Cms(CmsError),

    /// Credentials were rejected. Aborts the whole run.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// An item reached the writer without a usable slug.
    #[error("{kind} item {name:?} has no slug")]
    MissingIdentifier { kind: String, name: String },

    /// A write-capable command ran without `--yes` or `--dry-run`.
    #[error("refusing to write without confirmation: pass --yes to write, or --dry-run to preview")]
    NotConfirmed,

    /// The media mapping file could not be read or parsed.
    #[error("media map {path}: {reason}")]
    MediaMap { path: String, reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<CmsError> for SyncError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::Unauthorized { .. } => Self::Authentication(err.to_string()),
            other => Self::Cms(other),
        }
    }
}

impl SyncError {
    /// Whether the failed operation may succeed if retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Cms(err) if err.is_transient())
    }

    /// Whether the run must stop instead of moving on to the next item.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication(_) | Self::NotConfirmed | Self::MediaMap { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_becomes_authentication() {
        let err: SyncError = CmsError::Unauthorized { system: "WordPress" }.into();
        assert!(matches!(err, SyncError::Authentication(_)));
        assert!(err.is_fatal());
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_stay_transient() {
        let err: SyncError = CmsError::Api { status: 502, message: "bad gateway".into() }.into();
        assert!(err.is_transient());
        assert!(!err.is_fatal());
    }

    #[test]
    fn missing_identifier_is_an_item_error() {
        let err = SyncError::MissingIdentifier { kind: "work".into(), name: "Harbor".into() };
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "work item \"Harbor\" has no slug");
    }
}
