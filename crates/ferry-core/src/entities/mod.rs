//! Canonical, CMS-agnostic entity structs.
//!
//! All structs derive `Serialize` and `Deserialize` so they can be rendered in
//! CLI summaries and used as JSON fixtures in tests.

mod content;
mod media;

pub use content::{ContentItem, DestinationRecord};
pub use media::{MediaId, MediaRef, filename_from_url};
