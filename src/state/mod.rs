//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the coordinator's phase machine (fetching listing, draining queue, ...)
//! - `SessionState`: frontier, dedup sets and counters for one crawl session

mod phase;
mod session;

// Re-export main types
pub use phase::CrawlPhase;
pub use session::SessionState;
