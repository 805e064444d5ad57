use super::lock;
use crate::url::CanonicalUrl;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// Crawled page → same-domain pages it links to
pub type Sitemap = BTreeMap<CanonicalUrl, BTreeSet<CanonicalUrl>>;

/// Crawled page → every resource or link URL it references
pub type AssetIndex = BTreeMap<CanonicalUrl, BTreeSet<String>>;

/// Everything recorded for one crawled page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    /// Same-domain HTML pages linked from the page
    pub links: BTreeSet<CanonicalUrl>,

    /// Extractor resources plus every validated link
    pub assets: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct Maps {
    sitemap: Sitemap,
    assets: AssetIndex,
}

/// Shared sitemap and asset index
///
/// Workers write one entry per crawled page; the maps are handed out only
/// after every worker has terminated.
#[derive(Debug, Default)]
pub struct ResultStore {
    maps: Mutex<Maps>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the sitemap and asset entries for `page`
    ///
    /// Entries are written once and never merged. Returns false, leaving the
    /// existing entries untouched, if the page was already recorded.
    pub fn record_page(&self, page: CanonicalUrl, record: PageRecord) -> bool {
        let mut maps = lock(&self.maps);
        if maps.sitemap.contains_key(&page) {
            tracing::warn!("Page {} was already recorded, keeping the first entry", page);
            return false;
        }
        maps.sitemap.insert(page.clone(), record.links);
        maps.assets.insert(page, record.assets);
        true
    }

    /// Returns the number of recorded pages
    pub fn page_count(&self) -> usize {
        lock(&self.maps).sitemap.len()
    }

    /// Consumes the store and returns the sitemap and asset index
    pub fn into_maps(self) -> (Sitemap, AssetIndex) {
        let maps = self
            .maps
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        (maps.sitemap, maps.assets)
    }

    /// Moves the recorded maps out, leaving the store empty
    pub fn take_maps(&self) -> (Sitemap, AssetIndex) {
        let maps = std::mem::take(&mut *lock(&self.maps));
        (maps.sitemap, maps.assets)
    }
}
