//! Output module for reporting crawl results
//!
//! This module handles:
//! - The plain-text sitemap and asset listing
//! - Markdown summaries of a finished crawl
//! - Crawl counters and statistics

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::write_report;
pub use stats::{print_statistics, CrawlCounters, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
