//! # ferry-sync
//!
//! Moves canonical content from the source CMS into the destination CMS.
//!
//! - [`driver`]: the `sync`, `dedupe`, `fix-content` and `repair-media` passes
//! - [`media`]: media resolution behind the [`MediaResolver`] seam
//! - [`tags`]: tag name to term ID resolution
//! - [`payload`]: WordPress request bodies
//! - [`retry`]: linear-backoff retry of transient failures
//! - [`context`]: run flags ([`RunConfig`]) and per-run caches ([`SyncContext`])
//! - [`ports`]: the [`SourceCms`] / [`DestinationCms`] seams

pub mod context;
pub mod driver;
pub mod error;
pub mod media;
pub mod payload;
pub mod ports;
pub mod retry;
pub mod tags;

pub use context::{RunConfig, Scope, SlugOwner, SyncContext};
pub use driver::{DedupeReport, DuplicateGroup, RecordRef, SyncDriver};
pub use error::SyncError;
pub use media::{HeuristicMediaResolver, MappedMediaResolver, MediaResolver};
pub use ports::{DestinationCms, SourceCms};
pub use retry::{RetryPolicy, RetryableError, Sleeper, TokioSleeper, with_retry};
