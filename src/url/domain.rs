use crate::url::normalize::{canonicalize, CanonicalUrl};
use crate::UrlError;
use std::fmt;
use url::Url;

/// The domain a crawl is restricted to
///
/// Parsed from a bare authority such as `example.com` or `127.0.0.1:8080`.
/// Host comparison is exact: subdomains never match. When the domain was
/// given with an explicit port, a URL must also use that port to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlDomain {
    host: String,
    port: Option<u16>,
    match_www_variant: bool,
}

impl CrawlDomain {
    /// Parses a bare domain (no scheme, no path)
    ///
    /// # Examples
    ///
    /// ```
    /// use site_mapper::url::CrawlDomain;
    ///
    /// let domain = CrawlDomain::parse("Example.com").unwrap();
    /// assert_eq!(domain.host(), "example.com");
    /// assert_eq!(domain.root_url(), "http://example.com");
    ///
    /// assert!(CrawlDomain::parse("https://example.com").is_err());
    /// assert!(CrawlDomain::parse("example.com/path").is_err());
    /// ```
    pub fn parse(domain: &str) -> Result<Self, UrlError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(UrlError::MissingHost(String::new()));
        }
        if domain.contains("://") {
            return Err(UrlError::InvalidScheme(format!(
                "Domain must not include a scheme, got: {}",
                domain
            )));
        }
        if domain.contains(['/', '?', '#', '@']) {
            return Err(UrlError::Parse(format!(
                "Domain must be a bare host, got: {}",
                domain
            )));
        }

        let url = Url::parse(&format!("http://{}", domain))
            .map_err(|e| UrlError::Parse(format!("{}: {}", domain, e)))?;
        let host = extract_domain(&url).ok_or_else(|| UrlError::MissingHost(domain.to_string()))?;

        Ok(Self {
            host,
            port: url.port(),
            match_www_variant: false,
        })
    }

    /// Enables or disables treating `www.<domain>` and `<domain>` as one host
    pub fn with_www_variant(mut self, enabled: bool) -> Self {
        self.match_www_variant = enabled;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns `host[:port]`
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Returns the URL the crawl is seeded with
    pub fn root_url(&self) -> String {
        format!("http://{}", self.authority())
    }

    /// Returns true if `url` points at this domain
    pub fn matches(&self, url: &Url) -> bool {
        let host = match extract_domain(url) {
            Some(h) => h,
            None => return false,
        };

        let host_matches = if self.match_www_variant {
            strip_www(&host) == strip_www(&self.host)
        } else {
            host == self.host
        };

        match self.port {
            Some(port) => host_matches && url.port_or_known_default() == Some(port),
            None => host_matches,
        }
    }

    /// Canonicalizes `url` as a crawl key for this domain
    ///
    /// With the www variant enabled, a URL on `www.<domain>` or `<domain>` is
    /// keyed under the configured host, so both spellings are one target.
    /// Every other URL canonicalizes as usual.
    pub fn canonicalize(&self, url: &Url) -> Result<CanonicalUrl, UrlError> {
        if !self.match_www_variant
            || !self.matches(url)
            || url.host_str() == Some(self.host.as_str())
        {
            return canonicalize(url);
        }

        let mut rewritten = url.clone();
        rewritten
            .set_host(Some(&self.host))
            .map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;
        canonicalize(&rewritten)
    }
}

impl fmt::Display for CrawlDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority())
    }
}

/// Returns true if the URL's host is the crawl domain
///
/// This is an exact comparison; `blog.example.com` is not `example.com`.
pub fn is_same_domain(url: &Url, domain: &CrawlDomain) -> bool {
    domain.matches(url)
}

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mapper::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
