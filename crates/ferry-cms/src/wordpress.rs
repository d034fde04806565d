//! WordPress REST client (`/wp-json/wp/v2`).
//!
//! Authentication uses an application password over Basic auth. Application
//! passwords are displayed with spaces (`abcd efgh ijkl ...`); some installs
//! accept them verbatim and some only without the spaces, so a 401 with the
//! raw password is retried once with whitespace removed and the working form
//! is remembered for the rest of the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ferry_config::WordPressConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    USER_AGENT,
    error::CmsError,
    http::{check_response, total_pages},
};

const SYSTEM: &str = "WordPress";
const MEDIA_SEARCH_PAGE_SIZE: u32 = 20;

// ── Types ──────────────────────────────────────────────────────────

/// An attachment in the WordPress media library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpMedia {
    pub id: u64,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub mime_type: String,
}

/// A taxonomy term (tag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpTerm {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// The authenticated user, as returned by `users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpUser {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

// ── Client ─────────────────────────────────────────────────────────

/// Read/write client for the WordPress REST API.
pub struct WordPressClient {
    http: reqwest::Client,
    rest_root: String,
    username: String,
    password: String,
    /// Set when the password differs from its whitespace-stripped form.
    stripped_password: Option<String>,
    prefer_stripped: AtomicBool,
    per_page: u32,
}

impl WordPressClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Http`] if the underlying `reqwest::Client` fails
    /// to build.
    pub fn new(config: &WordPressConfig, timeout: Duration) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(
            http,
            &config.rest_root(),
            &config.username,
            &config.app_password,
            config.per_page,
        ))
    }

    /// Build a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(
        http: reqwest::Client,
        rest_root: &str,
        username: &str,
        password: &str,
        per_page: u32,
    ) -> Self {
        let stripped: String = password.split_whitespace().collect();
        Self {
            http,
            rest_root: rest_root.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            stripped_password: (stripped != password).then_some(stripped),
            prefer_stripped: AtomicBool::new(false),
            per_page: per_page.clamp(1, 100),
        }
    }

    #[must_use]
    pub fn rest_root(&self) -> &str {
        &self.rest_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.rest_root, path.trim_start_matches('/'))
    }

    /// Send an authenticated request built by `build`, falling back to the
    /// whitespace-stripped password on a 401.
    async fn send<F>(&self, build: F) -> Result<reqwest::Response, CmsError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let use_stripped = self.prefer_stripped.load(Ordering::Relaxed);
        let first = match (&self.stripped_password, use_stripped) {
            (Some(stripped), true) => stripped,
            _ => &self.password,
        };
        let resp = build()
            .basic_auth(&self.username, Some(first))
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED
            && !use_stripped
            && let Some(stripped) = &self.stripped_password
        {
            tracing::debug!("wordpress: retrying with whitespace-stripped application password");
            let retry = build()
                .basic_auth(&self.username, Some(stripped))
                .send()
                .await?;
            if retry.status().is_success() {
                self.prefer_stripped.store(true, Ordering::Relaxed);
            }
            return check_response(retry, SYSTEM).await;
        }
        check_response(resp, SYSTEM).await
    }

    async fn json<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
        what: &str,
    ) -> Result<T, CmsError> {
        resp.json()
            .await
            .map_err(|e| CmsError::Parse(format!("wordpress {what}: {e}")))
    }

    /// Fetch every record of a post type, all statuses, in edit context.
    ///
    /// # Errors
    ///
    /// Returns the first [`CmsError`] encountered.
    pub async fn list_all(&self, rest_base: &str) -> Result<Vec<Value>, CmsError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let url = self.url(&format!(
                "{rest_base}?per_page={}&page={page}&status=any&context=edit",
                self.per_page
            ));
            let resp = self.send(|| self.http.get(&url)).await?;
            let pages = total_pages(&resp);
            let mut batch: Vec<Value> = Self::json(resp, rest_base).await?;
            let empty = batch.is_empty();
            records.append(&mut batch);
            if empty || page >= pages {
                break;
            }
            page += 1;
        }
        tracing::info!(rest_base, count = records.len(), "wordpress: fetched records");
        Ok(records)
    }

    /// Records of a post type whose slug is exactly `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or the body cannot be parsed.
    pub async fn find_by_slug(&self, rest_base: &str, slug: &str) -> Result<Vec<Value>, CmsError> {
        let url = self.url(&format!(
            "{rest_base}?slug={}&status=any&context=edit",
            urlencoding::encode(slug)
        ));
        let resp = self.send(|| self.http.get(&url)).await?;
        Self::json(resp, rest_base).await
    }

    /// Create a record and return the created representation.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or WordPress rejects it.
    pub async fn create(&self, rest_base: &str, payload: &Value) -> Result<Value, CmsError> {
        let url = self.url(rest_base);
        let resp = self.send(|| self.http.post(&url).json(payload)).await?;
        Self::json(resp, rest_base).await
    }

    /// Update a record in place.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or WordPress rejects it.
    pub async fn update(&self, rest_base: &str, id: u64, payload: &Value) -> Result<Value, CmsError> {
        let url = self.url(&format!("{rest_base}/{id}"));
        let resp = self.send(|| self.http.post(&url).json(payload)).await?;
        Self::json(resp, rest_base).await
    }

    /// Move a record to the trash.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or WordPress rejects it.
    pub async fn trash(&self, rest_base: &str, id: u64) -> Result<(), CmsError> {
        let url = self.url(&format!("{rest_base}/{id}"));
        self.send(|| self.http.delete(&url)).await?;
        Ok(())
    }

    /// Search the media library by filename stem.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or the body cannot be parsed.
    pub async fn search_media(&self, stem: &str) -> Result<Vec<WpMedia>, CmsError> {
        let url = self.url(&format!(
            "media?search={}&per_page={MEDIA_SEARCH_PAGE_SIZE}",
            urlencoding::encode(stem)
        ));
        let resp = self.send(|| self.http.get(&url)).await?;
        Self::json(resp, "media").await
    }

    /// Upload a binary to the media library.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or WordPress rejects it.
    pub async fn upload_media(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<WpMedia, CmsError> {
        let url = self.url("media");
        let disposition = content_disposition(filename);
        let resp = self
            .send(|| {
                self.http
                    .post(&url)
                    .header(reqwest::header::CONTENT_DISPOSITION, disposition.as_str())
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(bytes.clone())
            })
            .await?;
        tracing::info!(filename, "wordpress: uploaded media");
        Self::json(resp, "media").await
    }

    /// Look up a tag by slug.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or the body cannot be parsed.
    pub async fn find_tag(&self, slug: &str) -> Result<Option<WpTerm>, CmsError> {
        let url = self.url(&format!("tags?slug={}", urlencoding::encode(slug)));
        let resp = self.send(|| self.http.get(&url)).await?;
        let terms: Vec<WpTerm> = Self::json(resp, "tags").await?;
        Ok(terms.into_iter().next())
    }

    /// Create a tag.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or WordPress rejects it.
    pub async fn create_tag(&self, name: &str) -> Result<WpTerm, CmsError> {
        let url = self.url("tags");
        let payload = serde_json::json!({ "name": name });
        let resp = self.send(|| self.http.post(&url).json(&payload)).await?;
        Self::json(resp, "tags").await
    }

    /// The user the credentials belong to.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Unauthorized`] when the credentials are rejected.
    pub async fn current_user(&self) -> Result<WpUser, CmsError> {
        let url = self.url("users/me");
        let resp = self.send(|| self.http.get(&url)).await?;
        Self::json(resp, "users/me").await
    }
}

/// `Content-Disposition` for an upload. Header values must be ASCII, so
/// non-ASCII names get an ASCII fallback plus the RFC 5987 `filename*` form.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();
    if filename.is_ascii() {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        )
    }
}
