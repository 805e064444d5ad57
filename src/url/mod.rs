//! URL handling module for Site-Mapper
//!
//! This module is the crawl's URL classifier: it reduces URLs to their canonical
//! crawl-key form, tells HTTP(S) URLs apart from everything else, and decides
//! whether a URL belongs to the crawl domain.

mod domain;
mod normalize;

use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_same_domain, CrawlDomain};
pub use normalize::{canonicalize, canonicalize_str, CanonicalUrl};

/// Returns true if the URL uses the `http` or `https` scheme
///
/// Links with any other scheme (`mailto:`, `javascript:`, `ftp:`, `tel:`, ...)
/// are dropped before a probe is ever issued. This check does no I/O.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mapper::url::is_http;
///
/// assert!(is_http(&Url::parse("https://example.com/").unwrap()));
/// assert!(!is_http(&Url::parse("mailto:someone@example.com").unwrap()));
/// ```
pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
