//! Configuration module for Listing-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use listing_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will save up to {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
pub mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractorConfig, NetworkConfig, OutputConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{config_fingerprint, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
