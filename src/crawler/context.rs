use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::registry::WorkerRegistry;
use crate::output::CrawlCounters;
use crate::storage::{InvalidUrlSet, ResultStore};
use crate::url::CrawlDomain;
use std::sync::Arc;
use std::time::Duration;

/// Everything the workers of one crawl share
///
/// Passed to each worker behind an `Arc`; nothing here is global.
pub struct CrawlContext {
    pub domain: CrawlDomain,
    pub fetcher: Arc<dyn Fetcher>,
    pub frontier: Frontier,
    pub registry: WorkerRegistry,
    pub invalid_urls: InvalidUrlSet,
    pub results: ResultStore,
    pub counters: CrawlCounters,

    /// How long an idle worker waits on the frontier per attempt
    pub dequeue_timeout: Duration,

    /// Pause before an idle worker asks again whether the crawl is over
    pub idle_backoff: Duration,
}

impl CrawlContext {
    pub fn new(domain: CrawlDomain, fetcher: Arc<dyn Fetcher>, config: &CrawlerConfig) -> Self {
        Self {
            domain,
            fetcher,
            frontier: Frontier::new(),
            registry: WorkerRegistry::new(config.workers),
            invalid_urls: InvalidUrlSet::new(),
            results: ResultStore::new(),
            counters: CrawlCounters::new(),
            dequeue_timeout: config.dequeue_timeout(),
            idle_backoff: config.idle_backoff(),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.registry.len()
    }
}
