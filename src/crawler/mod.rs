//! Crawler module: the concurrent crawl engine
//!
//! This module contains the core crawling logic, including:
//! - Link and resource extraction from HTML
//! - The `Fetcher` seam and its `reqwest` implementation
//! - The shared frontier and the worker status registry
//! - The worker state machine and overall crawl coordination

mod context;
mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod registry;
mod worker;

#[cfg(test)]
mod testing;

pub use context::CrawlContext;
pub use coordinator::{run, CrawlResults, Crawler};
pub use extractor::{extract, ExtractedLinks};
pub use fetcher::{
    build_http_client, check_status, FetchResponse, Fetcher, HttpFetcher, ProbeResponse,
};
pub use frontier::Frontier;
pub use registry::WorkerRegistry;
pub use worker::Worker;
