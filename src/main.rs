//! Site-Mapper main entry point
//!
//! This is the command-line interface for the Site-Mapper crawler.

use anyhow::{bail, Context};
use clap::Parser;
use site_mapper::config::{load_config_with_hash, validate, Config};
use site_mapper::output::{generate_markdown_summary, print_statistics, write_report};
use site_mapper::Crawler;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Site-Mapper: a concurrent single-domain site mapper
///
/// Site-Mapper crawls every page of one domain reachable from its root and
/// prints a sitemap together with the assets referenced by each page.
#[derive(Parser, Debug)]
#[command(name = "site-mapper")]
#[command(version)]
#[command(about = "A concurrent single-domain site mapper", long_about = None)]
struct Cli {
    /// Domain to crawl, e.g. example.com (overrides the config file)
    #[arg(value_name = "DOMAIN")]
    domain: Option<String>,

    /// Number of concurrent workers (overrides the config file)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a markdown summary to this path (overrides the config file)
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mapper=info,warn"),
            1 => EnvFilter::new("site_mapper=debug,info"),
            2 => EnvFilter::new("site_mapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(domain) = &cli.domain {
        config.crawler.domain = Some(domain.clone());
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }

    if config.crawler.domain.is_none() {
        bail!("no domain given: pass DOMAIN or set crawler.domain in the config file");
    }
    validate(&config).context("invalid configuration")?;

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Site-Mapper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Domain: {}",
        config.crawler.domain.as_deref().unwrap_or_default()
    );
    println!("  Workers: {}", config.crawler.workers);
    println!("  Dequeue timeout: {}ms", config.crawler.dequeue_timeout_ms);
    println!("  Idle backoff: {}ms", config.crawler.idle_backoff_ms);
    println!("  Match www variant: {}", config.crawler.match_www_variant);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nHTTP:");
    match config.http.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: client default"),
    }
    match config.http.connect_timeout_secs {
        Some(secs) => println!("  Connect timeout: {}s", secs),
        None => println!("  Connect timeout: client default"),
    }

    if let Some(path) = &config.output.summary_path {
        println!("\nSummary: {}", path);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let summary_path = config.output.summary_path.clone();
    let crawler = Crawler::with_http(config).context("failed to set up crawler")?;
    let domain = crawler.domain().to_string();

    let start = Instant::now();
    let results = crawler.run().await.context("crawl failed")?;
    let elapsed = start.elapsed();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&results.sitemap, &results.assets, &mut out)
        .context("failed to write report")?;
    out.flush()?;
    drop(out);

    print_statistics(&results.statistics);

    if let Some(path) = summary_path {
        generate_markdown_summary(&results, &domain, Path::new(&path))
            .with_context(|| format!("failed to write summary to {}", path))?;
        println!("\n✓ Summary exported to: {}", path);
    }

    println!("\nTotal time: {:.3}s", elapsed.as_secs_f64());
    Ok(())
}
