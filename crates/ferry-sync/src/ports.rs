//! The two CMS seams the sync passes talk through.
//!
//! Production code uses [`StrapiClient`] and [`WordPressClient`]; tests plug
//! in in-memory fakes that record every call.

use async_trait::async_trait;
use ferry_cms::{Asset, AssetHead, CmsError, StrapiClient, WordPressClient, WpMedia, WpTerm, WpUser};
use ferry_core::ContentKind;
use serde_json::Value;

/// Read access to the source CMS.
#[async_trait]
pub trait SourceCms: Send + Sync {
    /// Every raw record of a collection, all pages.
    async fn fetch_collection(&self, kind: ContentKind) -> Result<Vec<Value>, CmsError>;

    /// Download an asset; `None` when the source answers 404.
    async fn fetch_asset(&self, url: &str) -> Result<Option<Asset>, CmsError>;

    /// Check an asset exists without downloading it.
    async fn probe_asset(&self, url: &str) -> Result<Option<AssetHead>, CmsError>;

    /// Origin that relative media URLs resolve against.
    fn media_base(&self) -> Option<&str>;
}

/// Read/write access to the destination CMS.
#[async_trait]
pub trait DestinationCms: Send + Sync {
    async fn list(&self, kind: ContentKind) -> Result<Vec<Value>, CmsError>;
    async fn find_by_slug(&self, kind: ContentKind, slug: &str) -> Result<Vec<Value>, CmsError>;
    async fn create(&self, kind: ContentKind, payload: &Value) -> Result<Value, CmsError>;
    async fn update(&self, kind: ContentKind, id: u64, payload: &Value) -> Result<Value, CmsError>;
    async fn trash(&self, kind: ContentKind, id: u64) -> Result<(), CmsError>;
    async fn search_media(&self, stem: &str) -> Result<Vec<WpMedia>, CmsError>;
    async fn upload_media(&self, filename: &str, content_type: &str, bytes: Vec<u8>) -> Result<WpMedia, CmsError>;
    async fn find_tag(&self, slug: &str) -> Result<Option<WpTerm>, CmsError>;
    async fn create_tag(&self, name: &str) -> Result<WpTerm, CmsError>;
    async fn current_user(&self) -> Result<WpUser, CmsError>;
}

#[async_trait]
impl SourceCms for StrapiClient {
    async fn fetch_collection(&self, kind: ContentKind) -> Result<Vec<Value>, CmsError> {
        self.fetch_all(kind.strapi_collection()).await
    }

    async fn fetch_asset(&self, url: &str) -> Result<Option<Asset>, CmsError> {
        self.download(url).await
    }

    async fn probe_asset(&self, url: &str) -> Result<Option<AssetHead>, CmsError> {
        self.probe(url).await
    }

    fn media_base(&self) -> Option<&str> {
        Some(self.base_url())
    }
}

#[async_trait]
impl DestinationCms for WordPressClient {
    async fn list(&self, kind: ContentKind) -> Result<Vec<Value>, CmsError> {
        self.list_all(kind.wp_rest_base()).await
    }

    async fn find_by_slug(&self, kind: ContentKind, slug: &str) -> Result<Vec<Value>, CmsError> {
        Self::find_by_slug(self, kind.wp_rest_base(), slug).await
    }

    async fn create(&self, kind: ContentKind, payload: &Value) -> Result<Value, CmsError> {
        Self::create(self, kind.wp_rest_base(), payload).await
    }

    async fn update(&self, kind: ContentKind, id: u64, payload: &Value) -> Result<Value, CmsError> {
        Self::update(self, kind.wp_rest_base(), id, payload).await
    }

    async fn trash(&self, kind: ContentKind, id: u64) -> Result<(), CmsError> {
        Self::trash(self, kind.wp_rest_base(), id).await
    }

    async fn search_media(&self, stem: &str) -> Result<Vec<WpMedia>, CmsError> {
        Self::search_media(self, stem).await
    }

    async fn upload_media(&self, filename: &str, content_type: &str, bytes: Vec<u8>) -> Result<WpMedia, CmsError> {
        Self::upload_media(self, filename, content_type, bytes).await
    }

    async fn find_tag(&self, slug: &str) -> Result<Option<WpTerm>, CmsError> {
        Self::find_tag(self, slug).await
    }

    async fn create_tag(&self, name: &str) -> Result<WpTerm, CmsError> {
        Self::create_tag(self, name).await
    }

    async fn current_user(&self) -> Result<WpUser, CmsError> {
        Self::current_user(self).await
    }
}
