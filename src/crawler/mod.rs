//! Crawler module for paginated listing crawls
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - Item and pagination extraction from listing pages
//! - The deduplicating FIFO frontier
//! - Fixed-delay rate limiting
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
pub(crate) mod frontier;
mod parser;
mod rate_limit;

pub use coordinator::{
    run_crawl, Coordinator, CrawlReport, ItemError, ItemOutcome, StopReason,
};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::{Deduplicator, FrontierQueue};
pub use parser::{CrawlTarget, Extractor, ListingExtractor, Pagination};
pub use rate_limit::RateLimiter;
