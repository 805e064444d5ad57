use serde::Deserialize;
use std::time::Duration;

/// Default number of crawl workers
pub const DEFAULT_WORKERS: usize = 8;

/// Default time a worker waits on an empty frontier before checking for termination
pub const DEFAULT_DEQUEUE_TIMEOUT_MS: u64 = 1000;

/// Default pause between termination polls of an idle worker
pub const DEFAULT_IDLE_BACKOFF_MS: u64 = 50;

/// Main configuration structure for Site-Mapper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration for `domain` with `workers` workers and defaults elsewhere
    pub fn for_domain(domain: impl Into<String>, workers: usize) -> Self {
        Self {
            crawler: CrawlerConfig {
                domain: Some(domain.into()),
                workers,
                ..CrawlerConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Domain to crawl, e.g. `example.com` or `127.0.0.1:8080`
    #[serde(default)]
    pub domain: Option<String>,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// How long an idle worker waits for a URL before checking for termination (milliseconds)
    #[serde(rename = "dequeue-timeout-ms", default = "default_dequeue_timeout_ms")]
    pub dequeue_timeout_ms: u64,

    /// Pause between termination polls while other workers are busy (milliseconds)
    #[serde(rename = "idle-backoff-ms", default = "default_idle_backoff_ms")]
    pub idle_backoff_ms: u64,

    /// Treat `www.<domain>` and `<domain>` as the same host
    #[serde(rename = "match-www-variant", default)]
    pub match_www_variant: bool,
}

impl CrawlerConfig {
    pub fn dequeue_timeout(&self) -> Duration {
        Duration::from_millis(self.dequeue_timeout_ms)
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            domain: None,
            workers: DEFAULT_WORKERS,
            dequeue_timeout_ms: DEFAULT_DEQUEUE_TIMEOUT_MS,
            idle_backoff_ms: DEFAULT_IDLE_BACKOFF_MS,
            match_www_variant: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value as `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// HTTP transport configuration
///
/// Both timeouts are unset by default, leaving them to the HTTP client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(rename = "connect-timeout-secs", default)]
    pub connect_timeout_secs: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown summary file, if one should be written
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_dequeue_timeout_ms() -> u64 {
    DEFAULT_DEQUEUE_TIMEOUT_MS
}

fn default_idle_backoff_ms() -> u64 {
    DEFAULT_IDLE_BACKOFF_MS
}
