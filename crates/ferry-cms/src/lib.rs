//! # ferry-cms
//!
//! HTTP clients for the two content systems ferry moves data between:
//! - Strapi (source): paginated collection reads and asset downloads
//! - WordPress (destination): post-type CRUD, media library, tags, users
//!
//! Clients make exactly one attempt per call. Retrying transient failures is
//! the caller's decision (see [`CmsError::is_transient`]).

mod error;
mod http;
pub mod strapi;
pub mod wordpress;

pub use error::CmsError;
pub use strapi::{Asset, AssetHead, StrapiClient};
pub use wordpress::{WordPressClient, WpMedia, WpTerm, WpUser};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("ferry/", env!("CARGO_PKG_VERSION"));
