//! HTML link and resource extraction
//!
//! This module pulls every outgoing reference out of an HTML page:
//! - `<a href="...">` targets are **links** (candidate pages)
//! - `<link href="...">` targets are **resources**
//! - any tag's `src="..."` target is a **resource**
//!
//! References are resolved against the page URL but otherwise left as they
//! are; canonicalization happens later, in the URL classifier.

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// References extracted from one HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Absolute targets of `<a href>`
    pub links: BTreeSet<Url>,

    /// Absolute targets of `<link href>` and of every `src` attribute
    pub resources: BTreeSet<Url>,
}

impl ExtractedLinks {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.resources.is_empty()
    }
}

/// Extracts links and resources from an HTML document
///
/// The parser is error-tolerant: malformed markup is repaired the way a
/// browser would, and whatever was parsed is returned. A reference that
/// cannot be resolved against `base_url` is skipped on its own. A URL may
/// appear in both sets when the page references it both ways.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL of the page, used to resolve relative references
///
/// # Example
///
/// ```
/// use site_mapper::crawler::extract;
/// use url::Url;
///
/// let base = Url::parse("http://test.com").unwrap();
/// let extracted = extract(r#"<a href="/about">About</a><img src="logo.png">"#, &base);
///
/// assert!(extracted.links.contains(&Url::parse("http://test.com/about").unwrap()));
/// assert!(extracted.resources.contains(&Url::parse("http://test.com/logo.png").unwrap()));
/// ```
pub fn extract(html: &str, base_url: &Url) -> ExtractedLinks {
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        tracing::debug!(
            "Recovered from {} HTML parse errors on {}",
            document.errors.len(),
            base_url
        );
    }

    let mut extracted = ExtractedLinks::default();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(url) = element.value().attr("href").and_then(|h| resolve(h, base_url)) {
                extracted.links.insert(url);
            }
        }
    }

    if let Ok(link_selector) = Selector::parse("link[href]") {
        for element in document.select(&link_selector) {
            if let Some(url) = element.value().attr("href").and_then(|h| resolve(h, base_url)) {
                extracted.resources.insert(url);
            }
        }
    }

    if let Ok(src_selector) = Selector::parse("[src]") {
        for element in document.select(&src_selector) {
            if let Some(url) = element.value().attr("src").and_then(|s| resolve(s, base_url)) {
                extracted.resources.insert(url);
            }
        }
    }

    extracted
}

/// Resolves an attribute value against the page URL
fn resolve(reference: &str, base_url: &Url) -> Option<Url> {
    match base_url.join(reference) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Skipping unresolvable reference {:?} on {}: {}", reference, base_url, e);
            None
        }
    }
}
