//! Content kinds and per-item sync actions.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// ContentKind
// ---------------------------------------------------------------------------

/// The two content types moved between the CMSes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Work,
    Insight,
}

impl ContentKind {
    /// Every kind, in the order a full sync processes them.
    pub const ALL: [Self; 2] = [Self::Work, Self::Insight];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Insight => "insight",
        }
    }

    /// Strapi collection path segment (`/api/{collection}`).
    #[must_use]
    pub const fn strapi_collection(self) -> &'static str {
        match self {
            Self::Work => "works",
            Self::Insight => "insights",
        }
    }

    /// WordPress REST base of the registered custom post type
    /// (`/wp-json/wp/v2/{rest_base}`).
    #[must_use]
    pub const fn wp_rest_base(self) -> &'static str {
        match self {
            Self::Work => "works",
            Self::Insight => "insights",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "works" => Ok(Self::Work),
            "insight" | "insights" => Ok(Self::Insight),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ItemAction
// ---------------------------------------------------------------------------

/// What a sync pass decided to do with one source item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    Create,
    Update,
    Skip,
}

impl ItemAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
