/// Crawl phase definitions for the orchestration state machine
///
/// The coordinator moves through these phases once per listing page.
use std::fmt;

/// Represents the current phase of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Fetching and extracting the current listing page
    FetchingListing,

    /// Fetching and saving queued detail pages
    DrainingQueue,

    /// Deciding whether another listing page follows
    ResolvingPagination,

    /// Session is over (success or fatal error); no further transitions
    Terminated,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Any live phase may terminate. Otherwise the cycle is
    /// `FetchingListing -> DrainingQueue -> ResolvingPagination -> FetchingListing`.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Terminated, _) => false,
            (_, Self::Terminated) => true,
            (Self::FetchingListing, Self::DrainingQueue) => true,
            (Self::DrainingQueue, Self::ResolvingPagination) => true,
            (Self::ResolvingPagination, Self::FetchingListing) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchingListing => "fetching_listing",
            Self::DrainingQueue => "draining_queue",
            Self::ResolvingPagination => "resolving_pagination",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
