//! # ferry-core
//!
//! Canonical content model and error types for ferry.
//!
//! This crate provides the foundational types shared across all ferry crates:
//! - Entity structs for canonical content (`ContentItem`, `MediaRef`)
//! - Content kind and item action enums
//! - Per-run sync counters (`SyncResult`)
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod summary;

pub use entities::{ContentItem, DestinationRecord, MediaId, MediaRef, filename_from_url};
pub use enums::{ContentKind, ItemAction};
pub use errors::CoreError;
pub use summary::SyncResult;
