//! Tag names to WordPress term IDs.

use ferry_normalize::slugify;

use crate::context::{RunConfig, SyncContext};
use crate::error::SyncError;
use crate::ports::DestinationCms;
use crate::retry::{Sleeper, with_retry};

/// Resolve tag names to term IDs, creating missing terms when writes are
/// enabled. In a dry run, missing terms are reported and left out.
///
/// # Errors
///
/// Returns the first lookup or creation failure.
pub async fn resolve_tags(
    names: &[String],
    destination: &dyn DestinationCms,
    sleeper: &dyn Sleeper,
    run: &RunConfig,
    ctx: &mut SyncContext,
) -> Result<Vec<u64>, SyncError> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let slug = slugify(name);
        if slug.is_empty() {
            continue;
        }
        if let Some(id) = ctx.cached_tag(&slug) {
            if !ids.contains(&id) {
                ids.push(id);
            }
            continue;
        }

        let found = with_retry(&run.retry, sleeper, "tag lookup", || destination.find_tag(&slug)).await?;
        let id = match found {
            Some(term) => term.id,
            None if run.writes_enabled() => {
                let term = with_retry(&run.retry, sleeper, "tag create", || destination.create_tag(name)).await?;
                ctx.count_write();
                tracing::info!(tag = %name, id = term.id, "created tag");
                term.id
            }
            None => {
                tracing::info!(tag = %name, "dry run: would create tag");
                continue;
            }
        };
        ctx.cache_tag(slug, id);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}
