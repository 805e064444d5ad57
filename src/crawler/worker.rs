//! Crawl worker
//!
//! A worker is the unit of concurrency. It repeatedly takes a URL from the
//! frontier, fetches it, extracts its references, probes each link, records
//! the page, and queues newly found same-domain pages. It leaves the pool
//! once the frontier is empty and every worker is idle.

use crate::crawler::context::CrawlContext;
use crate::crawler::extractor::{extract, ExtractedLinks};
use crate::crawler::fetcher::{check_status, ProbeResponse};
use crate::state::{WorkerPhase, WorkerStatus};
use crate::storage::PageRecord;
use crate::url::{is_http, is_same_domain, CanonicalUrl};
use crate::{FetchResult, MapperError};
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

/// How a link was classified by its probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    /// HTML page on the crawl domain
    Page,
    /// HTML page on another domain
    ExternalPage,
    /// Anything with a non-HTML content type
    Asset,
}

/// One member of the worker pool
pub struct Worker {
    id: usize,
    phase: WorkerPhase,
    ctx: Arc<CrawlContext>,
}

impl Worker {
    pub fn new(id: usize, ctx: Arc<CrawlContext>) -> Self {
        Self {
            id,
            phase: WorkerPhase::Idle,
            ctx,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// Runs the crawl loop until the crawl is complete
    ///
    /// Returns the number of pages this worker recorded.
    pub async fn run(mut self) -> usize {
        tracing::debug!("Worker {} started", self.id);
        let mut pages = 0;

        loop {
            self.ctx.registry.set_status(self.id, WorkerStatus::Waiting);

            let dequeued = self
                .ctx
                .frontier
                .dequeue_for(&self.ctx.registry, self.id, self.ctx.dequeue_timeout)
                .await;

            match dequeued {
                Some(url) => match self.process_url(&url).await {
                    Ok(true) => pages += 1,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::error!("Worker {} failed on {}: {}", self.id, url, e);
                        self.phase = WorkerPhase::Idle;
                    }
                },
                None => {
                    if self.ctx.registry.crawl_complete(&self.ctx.frontier) {
                        break;
                    }
                    tracing::trace!(
                        "Worker {} idle, {} workers busy",
                        self.id,
                        self.ctx.registry.busy_count()
                    );
                    tokio::time::sleep(self.ctx.idle_backoff).await;
                }
            }
        }

        if let Err(e) = self.transition(WorkerPhase::Terminated) {
            tracing::error!("Worker {}: {}", self.id, e);
        }
        tracing::debug!("Worker {} terminated after {} pages", self.id, pages);
        pages
    }

    /// Crawls one page
    ///
    /// Returns Ok(false) when the fetch failed and the page was dropped.
    async fn process_url(&mut self, url: &CanonicalUrl) -> Result<bool, MapperError> {
        self.transition(WorkerPhase::Fetching)?;
        self.ctx.registry.set_status(self.id, WorkerStatus::Processing);

        let body = match self.fetch_page(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Could not open url {}: {}", url, e);
                self.ctx.counters.record_fetch_failure();
                self.transition(WorkerPhase::Idle)?;
                return Ok(false);
            }
        };

        self.transition(WorkerPhase::Extracting)?;
        let base_url = url.to_url()?;
        let extracted = extract(&body, &base_url);

        self.transition(WorkerPhase::ValidatingLinks)?;
        let record = self.validate_links(extracted).await;

        self.transition(WorkerPhase::Recording)?;
        tracing::debug!(
            "Worker {} crawled {} ({} pages linked, {} assets)",
            self.id,
            url,
            record.links.len(),
            record.assets.len()
        );
        if self.ctx.results.record_page(url.clone(), record) {
            let crawled = self.ctx.counters.record_page_crawled();
            if crawled % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier",
                    crawled,
                    self.ctx.frontier.len()
                );
            }
        }

        self.transition(WorkerPhase::Idle)?;
        Ok(true)
    }

    async fn fetch_page(&self, url: &CanonicalUrl) -> FetchResult<String> {
        let response = self.ctx.fetcher.fetch(url.as_str()).await?;
        check_status(url.as_str(), response.status)?;
        Ok(response.body)
    }

    /// Probes every extracted link and builds the page's record
    async fn validate_links(&self, extracted: ExtractedLinks) -> PageRecord {
        let mut record = PageRecord {
            links: BTreeSet::new(),
            assets: extracted.resources.iter().map(Url::to_string).collect(),
        };

        for raw in &extracted.links {
            let Some((canonical, kind)) = self.validate_link(raw, &record.links).await else {
                continue;
            };

            if kind == LinkKind::Page {
                record.links.insert(canonical.clone());
            }
            record.assets.insert(canonical.into_string());
        }

        record
    }

    /// Canonicalizes and probes one link
    ///
    /// Returns None for links that are skipped or fail their probe.
    async fn validate_link(
        &self,
        raw: &Url,
        accepted: &BTreeSet<CanonicalUrl>,
    ) -> Option<(CanonicalUrl, LinkKind)> {
        if !is_http(raw) {
            tracing::trace!("Skipping non-HTTP link {}", raw);
            return None;
        }

        let canonical = match self.ctx.domain.canonicalize(raw) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("Skipping link {}: {}", raw, e);
                return None;
            }
        };

        if accepted.contains(&canonical) {
            return None;
        }
        if self.ctx.invalid_urls.contains(&canonical) {
            self.ctx.counters.record_invalid_skip();
            return None;
        }

        let probe = match self.probe(&canonical).await {
            Ok(probe) => probe,
            Err(e) => {
                tracing::warn!("Could not open url {} ({})", canonical, e);
                self.ctx.counters.record_probe_failure();
                self.ctx.invalid_urls.insert(canonical);
                return None;
            }
        };

        if !probe.is_html() {
            self.ctx.counters.record_non_html_link();
            return Some((canonical, LinkKind::Asset));
        }

        if !is_same_domain(raw, &self.ctx.domain) {
            return Some((canonical, LinkKind::ExternalPage));
        }

        if self.ctx.frontier.enqueue(canonical.clone()) {
            self.ctx.counters.record_page_enqueued();
            tracing::debug!("Queued {}", canonical);
        }
        Some((canonical, LinkKind::Page))
    }

    async fn probe(&self, url: &CanonicalUrl) -> FetchResult<ProbeResponse> {
        self.ctx.counters.record_probe();
        let response = self.ctx.fetcher.probe(url.as_str()).await?;
        check_status(url.as_str(), response.status)?;
        Ok(response)
    }

    fn transition(&mut self, next: WorkerPhase) -> Result<(), MapperError> {
        if !self.phase.can_transition_to(next) {
            return Err(MapperError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Worker {}: {} -> {}", self.id, self.phase, next);
        self.phase = next;
        Ok(())
    }
}

impl Drop for Worker {
    /// A worker that goes away, even by panicking, must not block termination
    fn drop(&mut self) {
        self.ctx.registry.set_status(self.id, WorkerStatus::Waiting);
    }
}
