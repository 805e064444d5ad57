//! HTTP fetcher implementation
//!
//! The crawl engine only needs two network capabilities, expressed by the
//! `Fetcher` trait:
//! - `fetch`: a GET that returns the page body
//! - `probe`: a HEAD that returns the status and `Content-Type` without a body
//!
//! `HttpFetcher` implements both on top of `reqwest`. Tests substitute
//! in-memory fetchers.

use crate::config::{HttpConfig, UserAgentConfig};
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// A fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Page body content
    pub body: String,
}

/// The answer to a header-only probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,

    /// `Content-Type` header value, if the server sent one
    pub content_type: Option<String>,
}

impl ProbeResponse {
    /// Returns true if the probed URL should be treated as an HTML page
    ///
    /// A response without a `Content-Type` is assumed to be HTML.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(content_type) => content_type.contains("text/html"),
            None => true,
        }
    }
}

/// Network access used by crawl workers
///
/// Implementations report transport failures as `FetchError::Transport`.
/// They may return any status code; workers treat everything outside
/// 200..=299 as a failure.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Downloads `url` (GET)
    async fn fetch(&self, url: &str) -> FetchResult<FetchResponse>;

    /// Checks `url` without downloading the body (HEAD)
    async fn probe(&self, url: &str) -> FetchResult<ProbeResponse>;
}

/// Fails with `FetchError::Status` unless `status` is 2xx
pub fn check_status(url: &str, status: u16) -> FetchResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status,
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy. Timeouts are only
/// set when configured; otherwise the client's defaults apply.
///
/// # Example
///
/// ```no_run
/// use site_mapper::config::{HttpConfig, UserAgentConfig};
/// use site_mapper::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent.header_value())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = http.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = http.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// `Fetcher` backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        http: &HttpConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, http)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| transport_error(url, e))?;

        Ok(FetchResponse { status, body })
    }

    async fn probe(&self, url: &str) -> FetchResult<ProbeResponse> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            content_type: content_type(response.headers()),
        })
    }
}

/// Reads the `Content-Type` header, replacing any non-UTF-8 bytes
///
/// A header that is present but not visible ASCII still declares a type and
/// must not fall through to the "no content type" case.
fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// Classifies a reqwest error into a transport failure message
fn transport_error(url: &str, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_with_timeouts() {
        let http = HttpConfig {
            request_timeout_secs: Some(30),
            connect_timeout_secs: Some(5),
        };
        assert!(HttpFetcher::from_config(&UserAgentConfig::default(), &http).is_ok());
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("http://test.com", 200).is_ok());
        assert!(check_status("http://test.com", 204).is_ok());

        assert_eq!(
            check_status("http://test.com", 404),
            Err(FetchError::Status {
                url: "http://test.com".to_string(),
                status: 404
            })
        );
        assert!(check_status("http://test.com", 500).is_err());
        assert!(check_status("http://test.com", 304).is_err());
    }

    #[test]
    fn test_content_type_with_opaque_bytes_is_still_read() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_bytes(b"application/json; name=\xe9t\xe9").unwrap(),
        );

        let probe = ProbeResponse {
            status: 200,
            content_type: content_type(&headers),
        };
        assert!(probe
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json")));
        assert!(!probe.is_html());
    }

    #[test]
    fn test_absent_content_type_header() {
        assert_eq!(content_type(&HeaderMap::new()), None);
    }

    #[test]
    fn test_missing_content_type_is_html() {
        let probe = ProbeResponse {
            status: 200,
            content_type: None,
        };
        assert!(probe.is_html());
    }

    #[test]
    fn test_html_content_type_with_charset() {
        let probe = ProbeResponse {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
        };
        assert!(probe.is_html());
    }

    #[test]
    fn test_non_html_content_type() {
        for content_type in ["text/json", "image/png", "application/pdf", "text/css"] {
            let probe = ProbeResponse {
                status: 200,
                content_type: Some(content_type.to_string()),
            };
            assert!(!probe.is_html(), "{} should not be HTML", content_type);
        }
    }
}
