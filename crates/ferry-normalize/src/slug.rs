//! Duplicate-slug reconciliation.
//!
//! WordPress appends `-2`, `-3`, ... when a slug collides with an existing
//! post. These helpers strip such suffixes so records can be matched across
//! systems, and pick one canonical survivor among records that collapse onto
//! the same base slug.
//!
//! The accepted suffix range is `2..=99`. `-1` is never generated by
//! WordPress, and larger numbers are far more likely to be part of the real
//! slug (`page-1999`, `project-100`).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ferry_core::DestinationRecord;

const MIN_DUPLICATE_SUFFIX: u32 = 2;
const MAX_DUPLICATE_SUFFIX: u32 = 99;

/// Strip a WordPress duplicate suffix (`name-2` .. `name-99`) from `slug`.
///
/// Returns `slug` unchanged when the suffix is outside the range, has a
/// leading zero, or would leave an empty base.
#[must_use]
pub fn strip_suffix(slug: &str) -> &str {
    let Some((base, suffix)) = slug.rsplit_once('-') else {
        return slug;
    };
    if base.is_empty() || suffix.is_empty() || suffix.starts_with('0') {
        return slug;
    }
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return slug;
    }
    match suffix.parse::<u32>() {
        Ok(n) if (MIN_DUPLICATE_SUFFIX..=MAX_DUPLICATE_SUFFIX).contains(&n) => base,
        _ => slug,
    }
}

/// Whether `slug` carries a duplicate suffix.
#[must_use]
pub fn is_duplicate_slug(slug: &str) -> bool {
    strip_suffix(slug).len() != slug.len()
}

/// Lowercase, hyphen-separated slug derived from a display name.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch != '\'' && ch != '’' {
            pending_dash = true;
        }
    }
    slug
}

/// A record that can compete for survivorship of a base slug.
pub trait SlugCandidate {
    fn slug(&self) -> &str;
    fn published_at(&self) -> Option<DateTime<Utc>>;
    fn numeric_id(&self) -> u64;
}

impl SlugCandidate for DestinationRecord {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.date.or(self.item.publish_date)
    }

    fn numeric_id(&self) -> u64 {
        self.id
    }
}

/// Survivor ordering: `Greater` means `a` is the better survivor.
///
/// Non-duplicate slug first, then most recent publish timestamp (undated
/// records rank lowest), then highest numeric identifier.
pub fn survivor_order<T: SlugCandidate>(a: &T, b: &T) -> Ordering {
    let a_original = !is_duplicate_slug(a.slug());
    let b_original = !is_duplicate_slug(b.slug());
    a_original
        .cmp(&b_original)
        .then_with(|| a.published_at().cmp(&b.published_at()))
        .then_with(|| a.numeric_id().cmp(&b.numeric_id()))
}

/// Pick the canonical record among candidates sharing a base slug.
#[must_use]
pub fn pick_survivor<T: SlugCandidate>(candidates: &[T]) -> Option<&T> {
    candidates.iter().max_by(|a, b| survivor_order(*a, *b))
}

/// Group records by base slug. Groups keep input order.
pub fn group_by_base<T: SlugCandidate>(records: impl IntoIterator<Item = T>) -> BTreeMap<String, Vec<T>> {
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for record in records {
        let base = strip_suffix(record.slug()).to_string();
        groups.entry(base).or_default().push(record);
    }
    groups
}
