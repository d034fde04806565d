use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Identifier of an asset in the destination media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "id")]
pub enum MediaId {
    /// A real attachment ID returned by the destination system.
    Remote(u64),
    /// Dry-run sentinel: the asset would be uploaded but does not exist yet.
    Pending,
}

impl MediaId {
    /// The attachment ID, if this is a real destination asset.
    #[must_use]
    pub const fn remote(self) -> Option<u64> {
        match self {
            Self::Remote(id) => Some(id),
            Self::Pending => None,
        }
    }
}

/// A reference to one media asset, as seen from the source system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Absolute URL of the binary in the source system. Empty when only a
    /// destination ID is known (bare ACF attachment IDs).
    pub source_url: String,
    pub filename: String,
    pub mime_type: Option<String>,
    pub alt: Option<String>,
    /// Identifier in the source system (Strapi upload ID, WordPress `ID`).
    pub source_id: Option<String>,
    /// Populated once the resolver confirms or creates the asset.
    pub destination_id: Option<MediaId>,
}

impl MediaRef {
    /// Build a reference from a URL, deriving the filename from its last
    /// path segment.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        let source_url = url.into();
        let filename = filename_from_url(&source_url);
        Self {
            source_url,
            filename,
            mime_type: None,
            alt: None,
            source_id: None,
            destination_id: None,
        }
    }

    /// Build a reference to an asset that already exists at the destination.
    #[must_use]
    pub fn from_destination_id(id: u64) -> Self {
        Self {
            source_url: String::new(),
            filename: String::new(),
            mime_type: None,
            alt: None,
            source_id: Some(id.to_string()),
            destination_id: Some(MediaId::Remote(id)),
        }
    }

    /// This reference with `filename` derived from the URL when the source
    /// gave none.
    #[must_use]
    pub fn named(&self) -> Cow<'_, Self> {
        if self.filename.is_empty() && !self.source_url.is_empty() {
            Cow::Owned(Self {
                filename: filename_from_url(&self.source_url),
                ..self.clone()
            })
        } else {
            Cow::Borrowed(self)
        }
    }

    /// Filename without its extension, used as the media-library search term.
    #[must_use]
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map_or(self.filename.as_str(), |(stem, _)| stem)
    }
}

/// Percent-decoded last path segment of a URL, ignoring query and fragment.
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    urlencoding::decode(segment).map_or_else(|_| segment.to_string(), |d| d.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_url_takes_last_segment() {
        let media = MediaRef::from_url("https://cms.example.com/uploads/hero_shot.jpg?v=2");
        assert_eq!(media.filename, "hero_shot.jpg");
        assert_eq!(media.stem(), "hero_shot");
    }

    #[test]
    fn stem_without_extension() {
        let media = MediaRef::from_url("https://cms.example.com/uploads/raw");
        assert_eq!(media.stem(), "raw");
    }

    #[test]
    fn pending_has_no_remote_id() {
        assert_eq!(MediaId::Pending.remote(), None);
        assert_eq!(MediaId::Remote(7).remote(), Some(7));
    }

    #[test]
    fn filenames_are_percent_decoded() {
        assert_eq!(filename_from_url("https://x/y/%E2%82%AC.png?w=10"), "€.png");
        assert_eq!(filename_from_url("https://x/y/bad%FF.png"), "bad%FF.png");
        assert_eq!(MediaRef::from_url("/uploads/caf%C3%A9.jpg#top").stem(), "café");
    }

    #[test]
    fn named_fills_a_missing_filename_only() {
        let mut media = MediaRef::from_url("https://cms.example.com/uploads/dock.png");
        assert!(matches!(media.named(), Cow::Borrowed(_)));
        media.filename.clear();
        assert_eq!(media.named().filename, "dock.png");
        assert_eq!(media.named().stem(), "dock");
        assert!(MediaRef::from_destination_id(3).named().filename.is_empty());
    }

    #[test]
    fn destination_only_reference() {
        let media = MediaRef::from_destination_id(42);
        assert!(media.source_url.is_empty());
        assert_eq!(media.destination_id, Some(MediaId::Remote(42)));
    }
}
