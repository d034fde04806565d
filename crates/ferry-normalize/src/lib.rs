//! # ferry-normalize
//!
//! Converts raw Strapi and WordPress JSON records into the canonical
//! [`ferry_core::ContentItem`] model, and reconciles WordPress duplicate slugs.
//!
//! - [`entity`]: envelope classification and field mapping
//! - [`media`]: the four-shape media field normalizer
//! - [`boolean`]: lenient flag parsing
//! - [`slug`]: duplicate-suffix stripping and survivor selection

pub mod boolean;
pub mod entity;
pub mod media;
pub mod slug;

pub use boolean::{parse_boolean, value_as_bool};
pub use entity::{NormalizeOptions, RawRecord, normalize_all, normalize_destination, normalize_item, parse_date};
pub use media::{normalize_media, normalize_single_media};
pub use slug::{SlugCandidate, group_by_base, is_duplicate_slug, pick_survivor, slugify, strip_suffix};
