//! Listing-Crawler: a sequential crawler for paginated listings
//!
//! This crate walks a paginated listing, queues the detail pages it discovers,
//! fetches and saves each one, and stops once a quota of saved pages is reached
//! or the listing runs out of pages.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for session-level (fatal) failures
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Listing page {url} could not be fetched: {source}")]
    ListingFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Listing page {url} could not be extracted: {source}")]
    Extraction {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Errors reported by a page fetcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No response from {url}: {message}")]
    NoResponse { url: String, message: String },

    #[error("Access forbidden (403): {url}")]
    Blocked { url: String },

    #[error("Rate limited (429): {url}")]
    Throttled { url: String },

    #[error("HTTP {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Fetcher is closed")]
    Closed,
}

impl FetchError {
    /// Maps a non-200 status code to the matching error variant
    pub fn from_status(url: &str, status: u16) -> Self {
        match status {
            403 => Self::Blocked {
                url: url.to_string(),
            },
            429 => Self::Throttled {
                url: url.to_string(),
            },
            _ => Self::Status {
                url: url.to_string(),
                status,
            },
        }
    }

    /// Returns the HTTP status behind this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Blocked { .. } => Some(403),
            Self::Throttled { .. } => Some(429),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors reported by a content extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Malformed listing markup: {0}")]
    Malformed(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] UrlError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, CrawlTarget, StopReason};
pub use state::{CrawlPhase, SessionState};
