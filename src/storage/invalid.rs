use super::lock;
use crate::url::CanonicalUrl;
use std::collections::HashSet;
use std::sync::Mutex;

/// URLs whose probe failed during this run
///
/// Append-only and shared by all workers. A URL in this set is skipped
/// without a new probe wherever it is linked from.
#[derive(Debug, Default)]
pub struct InvalidUrlSet {
    urls: Mutex<HashSet<CanonicalUrl>>,
}

impl InvalidUrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL invalid; returns false if it already was
    pub fn insert(&self, url: CanonicalUrl) -> bool {
        lock(&self.urls).insert(url)
    }

    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        lock(&self.urls).contains(url)
    }

    pub fn len(&self) -> usize {
        lock(&self.urls).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the invalid URLs in sorted order
    pub fn to_sorted_vec(&self) -> Vec<CanonicalUrl> {
        let mut urls: Vec<_> = lock(&self.urls).iter().cloned().collect();
        urls.sort();
        urls
    }
}
