//! CMS client error types.

use thiserror::Error;

/// Errors that can occur when talking to Strapi or WordPress.
#[derive(Debug, Error)]
pub enum CmsError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The CMS returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the CMS.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The CMS rejected the configured credentials.
    #[error("{system} rejected the credentials (401)")]
    Unauthorized {
        /// `Strapi` or `WordPress`.
        system: &'static str,
    },

    /// The requested resource does not exist.
    #[error("not found: {url}")]
    NotFound {
        /// URL that returned 404.
        url: String,
    },

    /// The CMS returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse a CMS response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl CmsError {
    /// Whether retrying the same request may succeed: 5xx, 429, timeouts and
    /// connection failures. Other 4xx responses are permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(err) => {
                err.is_timeout()
                    || err.is_connect()
                    || err.status().is_some_and(|s| s.is_server_error())
            }
            Self::Api { status, .. } => *status >= 500,
            Self::RateLimited { .. } => true,
            Self::Unauthorized { .. } | Self::NotFound { .. } | Self::Parse(_) => false,
        }
    }

    /// Whether the CMS could not be reached at all (DNS, refused connection,
    /// timeout), as opposed to answering with an error.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_connect() || err.is_timeout())
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
