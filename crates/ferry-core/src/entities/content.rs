use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::MediaRef;
use crate::enums::ContentKind;

/// A Work or an Insight in CMS-agnostic form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub kind: ContentKind,
    /// Numeric or string identifier in the system the item was read from.
    pub source_id: Option<String>,
    /// Strapi v5 document identifier, preserved when present.
    pub document_id: Option<String>,
    pub name: String,
    pub slug: String,
    pub status: Option<String>,
    pub featured: bool,
    pub draft: bool,
    pub archived: bool,
    pub tags: Vec<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub client: Option<String>,
    pub body: Option<String>,
    pub description: Option<String>,
    pub brief: Option<String>,
    pub scope: Option<String>,
    pub details: Option<String>,
    pub main_image: Option<MediaRef>,
    pub cover_image: Option<MediaRef>,
    pub client_logo: Option<MediaRef>,
    pub thumbnail_image: Option<MediaRef>,
    pub gallery: Vec<MediaRef>,
}

impl ContentItem {
    /// An empty item with only the identifying fields set.
    #[must_use]
    pub fn new(kind: ContentKind, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            kind,
            source_id: None,
            document_id: None,
            name: name.into(),
            slug: slug.into(),
            status: None,
            featured: false,
            draft: false,
            archived: false,
            tags: Vec::new(),
            publish_date: None,
            client: None,
            body: None,
            description: None,
            brief: None,
            scope: None,
            details: None,
            main_image: None,
            cover_image: None,
            client_logo: None,
            thumbnail_image: None,
            gallery: Vec::new(),
        }
    }

    /// Rich-text fields by their canonical name, for sanitizing in place.
    pub fn rich_text_fields_mut(&mut self) -> [(&'static str, &mut Option<String>); 5] {
        [
            ("body", &mut self.body),
            ("description", &mut self.description),
            ("brief", &mut self.brief),
            ("scope", &mut self.scope),
            ("details", &mut self.details),
        ]
    }

    /// Single-valued media fields by their canonical name.
    pub fn media_fields_mut(&mut self) -> [(&'static str, &mut Option<MediaRef>); 4] {
        [
            ("main_image", &mut self.main_image),
            ("cover_image", &mut self.cover_image),
            ("client_logo", &mut self.client_logo),
            ("thumbnail_image", &mut self.thumbnail_image),
        ]
    }

    /// Whether any media reference on this item still lacks a destination ID.
    #[must_use]
    pub fn has_unresolved_media(&self) -> bool {
        [
            &self.main_image,
            &self.cover_image,
            &self.client_logo,
            &self.thumbnail_image,
        ]
        .into_iter()
        .flatten()
        .chain(self.gallery.iter())
        .any(|media| media.destination_id.is_none())
    }

    /// Whether the item should be published at the destination.
    #[must_use]
    pub fn is_publishable(&self) -> bool {
        !self.draft && !self.archived
    }
}

/// A record as it currently exists in the destination system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRecord {
    pub id: u64,
    pub slug: String,
    pub date: Option<DateTime<Utc>>,
    pub item: ContentItem,
}
