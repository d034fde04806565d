//! Strapi REST client: paginated collection reads and asset downloads.

use std::time::Duration;

use ferry_config::StrapiConfig;
use serde::Deserialize;
use serde_json::Value;

use crate::{USER_AGENT, error::CmsError, http::check_response};

const SYSTEM: &str = "Strapi";

#[derive(Debug, Deserialize)]
struct StrapiPage {
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    meta: StrapiMeta,
}

#[derive(Debug, Default, Deserialize)]
struct StrapiMeta {
    pagination: Option<StrapiPagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StrapiPagination {
    #[serde(default)]
    page_count: u32,
}

/// A downloaded binary together with its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Metadata of an asset that exists at the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHead {
    pub content_type: Option<String>,
}

/// Read-only client for a Strapi instance.
pub struct StrapiClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    page_size: u32,
}

impl StrapiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Http`] if the underlying `reqwest::Client` fails
    /// to build.
    pub fn new(config: &StrapiConfig, timeout: Duration) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(
            http,
            config.base_url(),
            &config.api_token,
            config.page_size,
        ))
    }

    /// Build a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str, api_token: &str, page_size: u32) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of a collection. Returns the records and the total
    /// page count reported by Strapi (1 when the response has no pagination
    /// metadata).
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails, Strapi returns a
    /// non-success status, or the body is not a Strapi list response.
    pub async fn fetch_page(&self, collection: &str, page: u32) -> Result<(Vec<Value>, u32), CmsError> {
        let url = format!(
            "{}/api/{}?populate=*&pagination[page]={page}&pagination[pageSize]={}",
            self.base_url,
            urlencoding::encode(collection),
            self.page_size,
        );
        tracing::debug!(%url, "strapi: fetching page");
        let resp = check_response(
            self.http.get(&url).bearer_auth(&self.api_token).send().await?,
            SYSTEM,
        )
        .await?;

        let body: StrapiPage = resp
            .json()
            .await
            .map_err(|e| CmsError::Parse(format!("strapi {collection} page {page}: {e}")))?;
        let page_count = body.meta.pagination.map_or(1, |p| p.page_count.max(1));
        Ok((body.data.unwrap_or_default(), page_count))
    }

    /// Fetch every record of a collection, following pagination.
    ///
    /// # Errors
    ///
    /// Returns the first [`CmsError`] encountered.
    pub async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, CmsError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let (mut batch, page_count) = self.fetch_page(collection, page).await?;
            let empty = batch.is_empty();
            records.append(&mut batch);
            if empty || page >= page_count {
                break;
            }
            page += 1;
        }
        tracing::info!(collection, count = records.len(), "strapi: fetched collection");
        Ok(records)
    }

    /// Download an asset. A 404 is not an error: it yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] for transport failures and non-404 error statuses.
    pub async fn download(&self, url: &str) -> Result<Option<Asset>, CmsError> {
        let resp = match check_response(self.http.get(url).send().await?, SYSTEM).await {
            Ok(resp) => resp,
            Err(CmsError::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        let content_type = content_type(&resp);
        let bytes = resp.bytes().await?.to_vec();
        Ok(Some(Asset { bytes, content_type }))
    }

    /// Check that an asset exists without downloading its body.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] for transport failures and non-404 error statuses.
    pub async fn probe(&self, url: &str) -> Result<Option<AssetHead>, CmsError> {
        match check_response(self.http.head(url).send().await?, SYSTEM).await {
            Ok(resp) => Ok(Some(AssetHead {
                content_type: content_type(&resp),
            })),
            Err(CmsError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn content_type(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}
