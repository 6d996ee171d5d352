// ABOUTME: Resource fetching for pages of the trip report site.
// ABOUTME: Handles HTTP fetching with size limits, charset decoding, and access-denied detection.

use std::collections::HashMap;

use bytes::Bytes;
use scraper::Html;

use crate::dom::{first_by_tag, parse_document, text};
use crate::error::ScrapeError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Title fragment the origin server uses on its access-denied page.
pub const FORBIDDEN_MARKER: &str = "403 Forbidden";

/// Options for fetching a resource.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Where the request ended up after redirects.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using the charset from the content-type header or detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    // The site's older pages are not always UTF-8.
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Fetch a resource from the given URL. Any failure is reported as UpstreamUnavailable.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ScrapeError> {
    tracing::info!(url, "fetching");

    let mut request = client.get(url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request.send().await.map_err(|e| {
        let reason = if e.is_timeout() {
            anyhow::anyhow!("request timed out: {}", e)
        } else {
            anyhow::anyhow!("request failed: {}", e)
        };
        ScrapeError::upstream(url, "Fetch", Some(reason))
    })?;

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ScrapeError::upstream(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| {
        ScrapeError::upstream(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ScrapeError::upstream(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if status != 200 {
        tracing::warn!(url, status, "upstream returned non-200 status");
        return Err(ScrapeError::upstream(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(FetchResult {
        final_url,
        content_type,
        body,
    })
}

/// True when the document is the origin server's access-denied page.
pub fn is_access_denied(doc: &Html) -> bool {
    first_by_tag(doc, "title").is_some_and(|t| text(t).contains(FORBIDDEN_MARKER))
}

/// Parse fetched HTML, refusing access-denied pages before any extraction runs.
pub fn parse_checked(html: &str, url: &str) -> Result<Html, ScrapeError> {
    let doc = parse_document(html);
    if is_access_denied(&doc) {
        tracing::warn!(url, "upstream denied access");
        return Err(ScrapeError::upstream(
            url,
            "Parse",
            Some(anyhow::anyhow!("access denied by origin server")),
        ));
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn create_test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent("test-agent")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_utf8() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/bob/");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<title>Bob</title>");
        });

        let result = fetch(&create_test_client(), &server.url("/bob/"), &FetchOptions::default())
            .await;
        mock.assert();

        let result = result.expect("fetch should succeed");
        assert_eq!(result.final_url, server.url("/bob/"));
        assert_eq!(result.text(), "<title>Bob</title>");
    }

    #[tokio::test]
    async fn test_fetch_sends_custom_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/bob/").header("x-test", "1");
            then.status(200).body("ok");
        });

        let mut opts = FetchOptions::default();
        opts.headers.insert("x-test".to_string(), "1".to_string());
        let result = fetch(&create_test_client(), &server.url("/bob/"), &opts).await;
        mock.assert();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_forbidden_status_is_upstream_unavailable() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/bob/");
            then.status(403).body("<title>403 Forbidden</title>");
        });

        let err = fetch(&create_test_client(), &server.url("/bob/"), &FetchOptions::default())
            .await
            .expect_err("should fail on 403");
        mock.assert();
        assert!(err.is_upstream_unavailable());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_upstream_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_secs(3)).body("late");
        });

        let err = fetch(&create_test_client(), &server.url("/slow"), &FetchOptions::default())
            .await
            .expect_err("should time out");
        assert!(err.is_upstream_unavailable());
        assert!(err.to_string().contains("timed out"), "{}", err);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Nothing listens on port 9 on a test host.
        let err = fetch(
            &create_test_client(),
            "http://127.0.0.1:9/bob/",
            &FetchOptions::default(),
        )
        .await
        .expect_err("should fail to connect");
        assert!(err.is_upstream_unavailable());
    }

    #[test]
    fn test_decode_windows_1252_with_chardetng() {
        let latin: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        assert_eq!(decode_body(latin, None), "café");
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=ISO-8859-1"),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn test_access_denied_title_is_rejected() {
        let html = "<html><head><title>403 Forbidden</title></head><body><h1>Forbidden</h1></body></html>";
        let err = parse_checked(html, "https://www.snwburd.com/bob/").unwrap_err();
        assert!(err.is_upstream_unavailable());

        let ok = parse_checked("<title>Bob's trip reports</title>", "u").unwrap();
        assert!(!is_access_denied(&ok));
    }
}
