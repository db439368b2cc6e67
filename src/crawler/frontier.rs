//! Frontier bookkeeping: the FIFO item queue and the seen-key sets
//!
//! Membership in a [`Deduplicator`] is monotonic for the lifetime of a
//! session; nothing is ever removed.

use crate::crawler::parser::CrawlTarget;
use std::collections::{HashSet, VecDeque};

/// Set of keys (item references or URLs) already handled this session
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` has been marked before
    pub fn seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Marks `key` as seen; marking twice is a no-op
    pub fn mark_seen(&mut self, key: &str) {
        if !self.seen.contains(key) {
            self.seen.insert(key.to_string());
        }
    }

    /// Marks `key` and reports whether it was new
    pub fn insert(&mut self, key: &str) -> bool {
        if self.seen(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Discovered-but-not-yet-fetched items, drained front to back
#[derive(Debug, Default)]
pub struct FrontierQueue {
    items: VecDeque<CrawlTarget>,
}

impl FrontierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: CrawlTarget) {
        self.items.push_back(item);
    }

    pub fn dequeue(&mut self) -> Option<CrawlTarget> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops everything still queued, returning how many items were dropped
    pub fn discard_remaining(&mut self) -> usize {
        let remaining = self.items.len();
        self.items.clear();
        remaining
    }
}
