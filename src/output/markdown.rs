//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a finished
//! crawl: run information, statistics, a per-page table and the invalid links.

use crate::crawler::CrawlResults;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const MAX_LISTED_INVALID: usize = 50;

/// Generates a markdown summary and writes it to `output_path`
///
/// # Arguments
///
/// * `results` - The results of a finished crawl
/// * `domain` - The crawled domain, used in the title
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    results: &CrawlResults,
    domain: &str,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(results, domain);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote markdown summary to {}", output_path.display());
    Ok(())
}

/// Formats crawl results as markdown
pub fn format_markdown_summary(results: &CrawlResults, domain: &str) -> String {
    let stats = &results.statistics;
    let mut md = String::new();

    md.push_str(&format!("# Site Map of {}\n\n", domain));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", stats.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        stats.duration().num_milliseconds() as f64 / 1000.0
    ));
    md.push_str(&format!("- **Workers**: {}\n\n", stats.workers));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Crawled**: {}\n", stats.pages_crawled));
    md.push_str(&format!("- **Fetch Failures**: {}\n", stats.fetch_failures));
    md.push_str(&format!("- **Links Probed**: {}\n", stats.links_probed));
    md.push_str(&format!("- **Non-HTML Links**: {}\n", stats.non_html_links));
    md.push_str(&format!("- **Invalid URLs**: {}\n", stats.invalid_urls));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    if !results.sitemap.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Page | Links | Assets |\n");
        md.push_str("|------|-------|--------|\n");

        for (page, links) in &results.sitemap {
            let assets = results.assets.get(page).map_or(0, |a| a.len());
            md.push_str(&format!("| {} | {} | {} |\n", page, links.len(), assets));
        }
        md.push('\n');
    }

    if !results.invalid_urls.is_empty() {
        md.push_str("## Invalid URLs\n\n");
        for url in results.invalid_urls.iter().take(MAX_LISTED_INVALID) {
            md.push_str(&format!("- {}\n", url));
        }
        if results.invalid_urls.len() > MAX_LISTED_INVALID {
            md.push_str(&format!(
                "\n... and {} more\n",
                results.invalid_urls.len() - MAX_LISTED_INVALID
            ));
        }
        md.push('\n');
    }

    md
}
