//! Shared HTTP response helpers for the CMS clients.
//!
//! Centralizes status-code checks so the Strapi and WordPress modules stay
//! focused on request construction and response mapping.

use crate::error::CmsError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **401** → [`CmsError::Unauthorized`] for `system`.
/// - **404** → [`CmsError::NotFound`] with the request URL.
/// - **429** → [`CmsError::RateLimited`] with `Retry-After` parsing (falls
///   back to 60 s if absent or unparseable).
/// - **Other non-success** → [`CmsError::Api`] with status code and body.
pub async fn check_response(
    resp: reqwest::Response,
    system: &'static str,
) -> Result<reqwest::Response, CmsError> {
    match resp.status().as_u16() {
        401 => return Err(CmsError::Unauthorized { system }),
        404 => {
            return Err(CmsError::NotFound {
                url: resp.url().to_string(),
            });
        }
        429 => {
            return Err(CmsError::RateLimited {
                retry_after_secs: parse_retry_after(&resp),
            });
        }
        _ => {}
    }
    if !resp.status().is_success() {
        return Err(CmsError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Parse WordPress's `X-WP-TotalPages` header, treating absence as one page.
pub fn total_pages(resp: &reqwest::Response) -> u32 {
    resp.headers()
        .get("x-wp-totalpages")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body("")
                .unwrap(),
        )
    }

    fn mock_response_with_header(status: u16, name: &str, value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header(name, value)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn parse_retry_after_from_header() {
        let resp = mock_response_with_header(429, "Retry-After", "120");
        assert_eq!(parse_retry_after(&resp), 120);
    }

    #[test]
    fn parse_retry_after_missing_header() {
        let resp = mock_response(429);
        assert_eq!(parse_retry_after(&resp), 60);
    }

    #[test]
    fn parse_retry_after_non_numeric() {
        let resp = mock_response_with_header(429, "Retry-After", "not-a-number");
        assert_eq!(parse_retry_after(&resp), 60);
    }

    #[test]
    fn total_pages_from_header() {
        let resp = mock_response_with_header(200, "X-WP-TotalPages", "7");
        assert_eq!(total_pages(&resp), 7);
        assert_eq!(total_pages(&mock_response(200)), 1);
    }

    #[tokio::test]
    async fn check_response_unauthorized() {
        let err = check_response(mock_response(401), "WordPress").await.unwrap_err();
        assert!(matches!(err, CmsError::Unauthorized { system: "WordPress" }));
    }

    #[tokio::test]
    async fn check_response_not_found() {
        let err = check_response(mock_response(404), "Strapi").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn check_response_rate_limited_with_header() {
        let resp = mock_response_with_header(429, "Retry-After", "30");
        let err = check_response(resp, "Strapi").await.unwrap_err();
        assert!(matches!(
            err,
            CmsError::RateLimited {
                retry_after_secs: 30
            }
        ));
    }

    #[tokio::test]
    async fn check_response_api_error() {
        let err = check_response(mock_response(500), "Strapi").await.unwrap_err();
        assert!(matches!(err, CmsError::Api { status: 500, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200), "Strapi").await.is_ok());
    }
}
