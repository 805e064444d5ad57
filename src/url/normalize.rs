use crate::UrlError;
use std::borrow::Borrow;
use std::fmt;
use url::Url;

/// A URL in canonical crawl-key form
///
/// The canonical form keeps only the scheme, the host (with any non-default
/// port) and the path with leading and trailing slashes removed. Query
/// strings and fragments are dropped. Two URLs with the same canonical form
/// are the same crawl target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parses the canonical form back into a `Url`
    pub fn to_url(&self) -> Result<Url, UrlError> {
        Url::parse(&self.0).map_err(|e| UrlError::Parse(format!("{}: {}", self.0, e)))
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalUrl {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<CanonicalUrl> for String {
    fn from(url: CanonicalUrl) -> Self {
        url.0
    }
}

/// Reduces a URL to its canonical form
///
/// # Normalization Steps
///
/// 1. Keep the scheme and host (the `url` crate has already lowercased both)
/// 2. Keep the port only when it is not the scheme's default
/// 3. Strip every leading and trailing `/` from the path
/// 4. Drop user info, query and fragment
///
/// The domain root renders without a trailing slash. Applying the function
/// to its own output returns the same value.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mapper::url::canonicalize;
///
/// let url = Url::parse("http://test.com/about/?lang=en#team").unwrap();
/// assert_eq!(canonicalize(&url).unwrap().as_str(), "http://test.com/about");
///
/// let root = Url::parse("http://test.com/").unwrap();
/// assert_eq!(canonicalize(&root).unwrap().as_str(), "http://test.com");
/// ```
pub fn canonicalize(url: &Url) -> Result<CanonicalUrl, UrlError> {
    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let mut canonical = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        canonical.push_str(&format!(":{}", port));
    }

    let path = url.path().trim_matches('/');
    if !path.is_empty() {
        canonical.push('/');
        canonical.push_str(path);
    }

    Ok(CanonicalUrl(canonical))
}

/// Parses a URL string and reduces it to canonical form
pub fn canonicalize_str(url_str: &str) -> Result<CanonicalUrl, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
    canonicalize(&url)
}
