//! Configuration module for Site-Mapper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section except `[crawler]` is optional, and `Config::for_domain` builds a
//! configuration with defaults for callers that only have a domain and a worker count.
//!
//! # Example
//!
//! ```no_run
//! use site_mapper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-mapper.toml")).unwrap();
//! println!("Crawler will start {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
