//! Crawl coordinator
//!
//! Builds the shared crawl context, seeds the frontier with the domain root,
//! spawns the worker pool and collects the results once every worker has
//! left the pool.

use crate::config::Config;
use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::worker::Worker;
use crate::output::CrawlStatistics;
use crate::storage::{AssetIndex, Sitemap};
use crate::url::{canonicalize_str, CanonicalUrl, CrawlDomain};
use crate::{ConfigError, MapperError};
use chrono::Utc;
use std::sync::Arc;

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlResults {
    /// Crawled page -> same-domain pages it links to
    pub sitemap: Sitemap,

    /// Crawled page -> every resource and validated link it references
    pub assets: AssetIndex,

    /// Links whose probe failed, sorted
    pub invalid_urls: Vec<CanonicalUrl>,

    pub statistics: CrawlStatistics,
}

/// A configured, ready-to-run crawl
pub struct Crawler {
    config: Config,
    domain: CrawlDomain,
    fetcher: Arc<dyn Fetcher>,
}

impl Crawler {
    /// Creates a crawler using the given fetcher
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or names no domain.
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, MapperError> {
        crate::config::validate(&config)?;

        let domain = config
            .crawler
            .domain
            .as_deref()
            .ok_or_else(|| ConfigError::Validation("no domain configured".to_string()))?;
        let domain = CrawlDomain::parse(domain)?.with_www_variant(config.crawler.match_www_variant);

        Ok(Self {
            config,
            domain,
            fetcher,
        })
    }

    /// Creates a crawler backed by a `reqwest` client built from the configuration
    pub fn with_http(config: Config) -> Result<Self, MapperError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.http)?;
        Self::new(config, Arc::new(fetcher))
    }

    pub fn domain(&self) -> &CrawlDomain {
        &self.domain
    }

    /// Crawls the domain to exhaustion
    pub async fn run(self) -> Result<CrawlResults, MapperError> {
        let started_at = Utc::now();
        let root = canonicalize_str(&self.domain.root_url())?;

        let ctx = Arc::new(CrawlContext::new(
            self.domain,
            self.fetcher,
            &self.config.crawler,
        ));
        ctx.frontier.enqueue(root.clone());

        tracing::info!(
            "Starting crawl of {} with {} workers",
            root,
            ctx.worker_count()
        );

        let handles: Vec<_> = (0..ctx.worker_count())
            .map(|id| tokio::spawn(Worker::new(id, Arc::clone(&ctx)).run()))
            .collect();

        for (id, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                tracing::error!("Worker {} panicked: {}", id, e);
            }
        }

        let finished_at = Utc::now();
        let (sitemap, assets) = ctx.results.take_maps();
        let invalid_urls = ctx.invalid_urls.to_sorted_vec();
        let statistics = ctx.counters.finish(
            ctx.worker_count(),
            invalid_urls.len(),
            started_at,
            finished_at,
        );

        tracing::info!(
            "Crawl completed: {} pages crawled in {}ms",
            statistics.pages_crawled,
            statistics.duration().num_milliseconds()
        );

        Ok(CrawlResults {
            sitemap,
            assets,
            invalid_urls,
            statistics,
        })
    }
}

/// Crawls `domain` over HTTP with `worker_count` workers and default settings
///
/// # Example
///
/// ```no_run
/// # async fn example() -> site_mapper::Result<()> {
/// let results = site_mapper::run("example.com", 8).await?;
/// for (page, links) in &results.sitemap {
///     println!("{} -> {} links", page, links.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run(domain: &str, worker_count: usize) -> Result<CrawlResults, MapperError> {
    Crawler::with_http(Config::for_domain(domain, worker_count))?
        .run()
        .await
}
