//! Per-session crawl state
//!
//! Everything the coordinator mutates during a run lives here: the current
//! phase, the frontier, the three dedup sets and the counters. The state is
//! created at session start and dropped at session end.

use crate::crawler::frontier::{Deduplicator, FrontierQueue};
use crate::crawler::CrawlTarget;
use crate::state::CrawlPhase;
use crate::url::normalize_url;
use crate::CrawlerError;

#[derive(Debug)]
pub struct SessionState {
    quota: u32,
    phase: CrawlPhase,
    frontier: FrontierQueue,
    seen_references: Deduplicator,
    visited_urls: Deduplicator,
    visited_listings: Deduplicator,
    saved: u32,
    listing_pages: u32,
    failed_items: u32,
    duplicates_skipped: u32,
}

impl SessionState {
    /// Creates an empty session that stops after `quota` saved pages
    pub fn new(quota: u32) -> Self {
        Self {
            quota,
            phase: CrawlPhase::FetchingListing,
            frontier: FrontierQueue::new(),
            seen_references: Deduplicator::new(),
            visited_urls: Deduplicator::new(),
            visited_listings: Deduplicator::new(),
            saved: 0,
            listing_pages: 0,
            failed_items: 0,
            duplicates_skipped: 0,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, rejecting transitions the phase machine does not allow
    pub fn advance(&mut self, next: CrawlPhase) -> Result<(), CrawlerError> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!(from = %self.phase, to = %next, "Phase transition");
        self.phase = next;
        Ok(())
    }

    /// Ends the session; a no-op if it already ended
    pub fn terminate(&mut self) {
        self.phase = CrawlPhase::Terminated;
        let dropped = self.frontier.discard_remaining();
        if dropped > 0 {
            tracing::debug!("Discarding {} queued items at session end", dropped);
        }
    }

    /// Records a listing URL as fetched; returns false if it was fetched before
    pub fn begin_listing(&mut self, url: &str) -> bool {
        if !self.visited_listings.insert(&visit_key(url)) {
            return false;
        }
        self.listing_pages += 1;
        true
    }

    /// Returns true if `url` was already fetched as a listing page
    pub fn listing_visited(&self, url: &str) -> bool {
        self.visited_listings.seen(&visit_key(url))
    }

    /// Queues every candidate whose reference is new this session
    ///
    /// Returns the number of items added to the frontier.
    pub fn absorb_candidates(&mut self, candidates: Vec<CrawlTarget>) -> usize {
        let mut added = 0;
        for candidate in candidates {
            if self.seen_references.insert(&candidate.reference) {
                self.frontier.enqueue(candidate);
                added += 1;
            }
        }
        added
    }

    /// True while fewer than `quota` pages have been saved
    pub fn quota_open(&self) -> bool {
        self.saved < self.quota
    }

    /// Pops the next queued item, or `None` when the queue is empty or the
    /// quota has been reached
    pub fn next_item(&mut self) -> Option<CrawlTarget> {
        if !self.quota_open() {
            return None;
        }
        self.frontier.dequeue()
    }

    /// Marks an item's URL visited; returns false if it was visited before
    pub fn claim_url(&mut self, item: &CrawlTarget) -> bool {
        self.visited_urls.insert(&visit_key(&item.url))
    }

    /// Index the next saved page will carry (1-based)
    pub fn next_save_index(&self) -> u32 {
        self.saved + 1
    }

    /// Counts one saved page and returns the new total
    pub fn record_saved(&mut self) -> u32 {
        debug_assert!(self.saved < self.quota, "saved count would exceed quota");
        self.saved += 1;
        self.saved
    }

    pub fn record_failure(&mut self) {
        self.failed_items += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates_skipped += 1;
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    pub fn saved(&self) -> u32 {
        self.saved
    }

    pub fn listing_pages(&self) -> u32 {
        self.listing_pages
    }

    pub fn failed_items(&self) -> u32 {
        self.failed_items
    }

    pub fn duplicates_skipped(&self) -> u32 {
        self.duplicates_skipped
    }

    pub fn queued(&self) -> usize {
        self.frontier.len()
    }
}

/// Key used by the URL-based sets; unparseable URLs fall back to the raw string
fn visit_key(url: &str) -> String {
    normalize_url(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}
