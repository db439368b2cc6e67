//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Fetching listing pages and queueing newly discovered items
//! - Draining the frontier against the saved-page quota
//! - Following pagination until the quota is met or the listing runs out
//! - Absorbing per-item failures while listing failures end the session
//! - Releasing the fetcher on every exit path

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{FetchedPage, HttpFetcher, PageFetcher};
use crate::crawler::parser::{CrawlTarget, Extractor, ListingExtractor};
use crate::crawler::rate_limit::RateLimiter;
use crate::state::{CrawlPhase, SessionState};
use crate::storage::{FileStore, PageStore, StorageError};
use crate::{CrawlerError, FetchError};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::Instrument;
use url::Url;

/// Why a crawl session ended
#[derive(Debug)]
pub enum StopReason {
    /// The configured number of pages was saved
    QuotaReached,

    /// The last listing page had no next page
    Exhausted,

    /// Pagination pointed back at a listing page that was already fetched
    PaginationLoop { url: String },

    /// The configured listing-page cap was hit
    ListingLimit { limit: u32 },

    /// A session-level error ended the crawl
    Aborted(CrawlerError),
}

impl StopReason {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Aborted(_))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::QuotaReached => "target reached".to_string(),
            Self::Exhausted => "no more listing pages".to_string(),
            Self::PaginationLoop { url } => format!("pagination repeated {}", url),
            Self::ListingLimit { limit } => format!("listing page limit ({}) reached", limit),
            Self::Aborted(e) => format!("aborted: {}", e),
        }
    }
}

/// Failure of a single item; never ends the session
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("save failed: {0}")]
    Persist(#[from] StorageError),
}

/// Result of processing one dequeued item
#[derive(Debug)]
pub enum ItemOutcome {
    /// Fetched and persisted as page `index`
    Saved { index: u32, path: PathBuf },

    /// The item's URL was already processed this session
    AlreadyVisited,

    /// Fetching or saving failed; the item is dropped
    Failed(ItemError),
}

/// Final tally of a crawl session
#[derive(Debug)]
pub struct CrawlReport {
    pub quota: u32,
    pub saved: u32,
    pub listing_pages: u32,
    pub failed_items: u32,
    pub duplicates_skipped: u32,
    pub elapsed: Duration,
    pub stop: StopReason,
}

impl CrawlReport {
    pub fn is_success(&self) -> bool {
        self.stop.is_success()
    }

    /// The session-level error, if the crawl was aborted
    pub fn error(&self) -> Option<&CrawlerError> {
        match &self.stop {
            StopReason::Aborted(e) => Some(e),
            _ => None,
        }
    }
}

/// Main crawler coordinator structure
///
/// Owns the session state and the three collaborators for the lifetime of
/// one crawl. [`Coordinator::run`] consumes it, so a fetcher is closed once.
pub struct Coordinator<F, E, S> {
    settings: CrawlerConfig,
    start_url: Url,
    fetcher: F,
    extractor: E,
    store: S,
    limiter: RateLimiter,
    session: SessionState,
}

impl<F, E, S> Coordinator<F, E, S>
where
    F: PageFetcher,
    E: Extractor,
    S: PageStore,
{
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `settings` - Crawl session settings (start URL, quota, delay)
    /// * `fetcher` - Page fetcher; closed when the session ends
    /// * `extractor` - Listing item and pagination extractor
    /// * `store` - Destination for saved detail pages
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlerError)` - The start URL does not parse
    pub fn new(settings: CrawlerConfig, fetcher: F, extractor: E, store: S) -> Result<Self, CrawlerError> {
        let start_url = Url::parse(&settings.start_url)?;
        let limiter = RateLimiter::from_millis(settings.delay_ms);
        let session = SessionState::new(settings.max_pages);

        Ok(Self {
            settings,
            start_url,
            fetcher,
            extractor,
            store,
            limiter,
            session,
        })
    }

    /// Runs the session to completion and releases the fetcher
    ///
    /// Never returns an error: a fatal failure is reported as
    /// [`StopReason::Aborted`] alongside the counters reached before it.
    pub async fn run(self) -> CrawlReport {
        let span = tracing::info_span!(
            "crawl_session",
            start_url = %self.start_url,
            quota = self.settings.max_pages
        );
        self.run_session().instrument(span).await
    }

    async fn run_session(mut self) -> CrawlReport {
        let started = Instant::now();
        tracing::info!(
            "Starting crawl session: target {} detail pages, page size {}",
            self.settings.max_pages,
            self.settings.page_size
        );

        let stop = match self.crawl_loop().await {
            Ok(reason) => reason,
            Err(e) => {
                tracing::error!(
                    error_class = error_class(&e),
                    error = %e,
                    "Crawl session aborted"
                );
                StopReason::Aborted(e)
            }
        };

        self.session.terminate();

        if let Err(e) = self.fetcher.close().await {
            tracing::warn!(error_class = "cleanup", error = %e, "Failed to release fetcher");
        }

        let report = CrawlReport {
            quota: self.session.quota(),
            saved: self.session.saved(),
            listing_pages: self.session.listing_pages(),
            failed_items: self.session.failed_items(),
            duplicates_skipped: self.session.duplicates_skipped(),
            elapsed: started.elapsed(),
            stop,
        };

        tracing::info!(
            saved = report.saved,
            listing_pages = report.listing_pages,
            failed_items = report.failed_items,
            "Crawl session finished: {}",
            report.stop.describe()
        );

        report
    }

    /// The listing-page state machine; returns how the session ended
    async fn crawl_loop(&mut self) -> Result<StopReason, CrawlerError> {
        self.store.prepare()?;

        let mut current = self.start_url.clone();

        loop {
            if !self.session.begin_listing(current.as_str()) {
                return Ok(StopReason::PaginationLoop {
                    url: current.to_string(),
                });
            }

            tracing::info!(
                "Processing listing page #{}: {} ({}/{} saved)",
                self.session.listing_pages(),
                current,
                self.session.saved(),
                self.session.quota()
            );

            let listing = self.fetch_listing(&current).await?;

            let candidates = self
                .extractor
                .extract_items(&listing.content, &self.start_url)
                .map_err(|source| CrawlerError::Extraction {
                    url: current.to_string(),
                    source,
                })?;
            let found = candidates.len();
            let added = self.session.absorb_candidates(candidates);
            tracing::info!(
                "Found {} items ({} new), {} queued",
                found,
                added,
                self.session.queued()
            );

            self.session.advance(CrawlPhase::DrainingQueue)?;
            self.drain_queue().await;

            self.session.advance(CrawlPhase::ResolvingPagination)?;
            let pagination = self
                .extractor
                .extract_pagination(&listing.content, &self.start_url)
                .map_err(|source| CrawlerError::Extraction {
                    url: current.to_string(),
                    source,
                })?;
            tracing::debug!(
                "Pagination: page {}, next {:?}",
                pagination.current_page,
                pagination.next_page_url.as_ref().map(Url::as_str)
            );

            if !self.session.quota_open() {
                return Ok(StopReason::QuotaReached);
            }

            let Some(next) = pagination.next_page_url else {
                return Ok(StopReason::Exhausted);
            };

            if self.session.listing_visited(next.as_str()) {
                tracing::warn!("Pagination returned an already fetched page: {}", next);
                return Ok(StopReason::PaginationLoop {
                    url: next.to_string(),
                });
            }

            if let Some(limit) = self.settings.max_listing_pages {
                if self.session.listing_pages() >= limit {
                    return Ok(StopReason::ListingLimit { limit });
                }
            }

            self.limiter.pause_between_listings().await;
            self.session.advance(CrawlPhase::FetchingListing)?;
            current = next;
        }
    }

    async fn fetch_listing(&mut self, url: &Url) -> Result<FetchedPage, CrawlerError> {
        self.fetcher
            .fetch(url.as_str())
            .await
            .map_err(|source| CrawlerError::ListingFetch {
                url: url.to_string(),
                source,
            })
    }

    /// Processes queued items until the queue is empty or the quota is met
    async fn drain_queue(&mut self) {
        while let Some(item) = self.session.next_item() {
            match self.process_item(&item).await {
                ItemOutcome::Saved { index, path } => {
                    tracing::debug!("Item {} saved as #{} at {}", item.reference, index, path.display());
                }
                ItemOutcome::AlreadyVisited => {
                    self.session.record_duplicate();
                    tracing::debug!("Skipping already visited URL: {}", item.url);
                    continue;
                }
                ItemOutcome::Failed(err) => {
                    self.session.record_failure();
                    tracing::warn!(
                        error_class = "recoverable_item",
                        reference = %item.reference,
                        make = %item.make,
                        model = %item.model,
                        url = %item.url,
                        error = %err,
                        "Skipping item"
                    );
                }
            }

            self.limiter.pause_after_item().await;
        }
    }

    /// Fetches and saves one item; failures are returned, never raised
    async fn process_item(&mut self, item: &CrawlTarget) -> ItemOutcome {
        if !self.session.claim_url(item) {
            return ItemOutcome::AlreadyVisited;
        }

        tracing::info!("Fetching: {}/{}/{}", item.make, item.model, item.reference);

        let page = match self.fetcher.fetch(&item.url).await {
            Ok(page) => page,
            Err(e) => return ItemOutcome::Failed(e.into()),
        };

        let index = self.session.next_save_index();
        match self.store.save(index, item, &page) {
            Ok(path) => {
                self.session.record_saved();
                ItemOutcome::Saved { index, path }
            }
            Err(e) => ItemOutcome::Failed(e.into()),
        }
    }
}

/// Runs a complete crawl session
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP fetcher, listing extractor and file store
/// 2. Walk listing pages, queueing newly seen items
/// 3. Fetch and save queued items until the quota is met
/// 4. Follow pagination until the listing runs out
/// 5. Close the fetcher and report the outcome
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The session ran; check [`CrawlReport::error`] for an abort
/// * `Err(CrawlerError)` - The HTTP client, extractor or start URL could not be built
pub async fn run_crawl(config: Config) -> Result<CrawlReport, CrawlerError> {
    let fetcher = HttpFetcher::new(&config.network)?;
    let extractor = ListingExtractor::new(&config.extractor)?;
    let store = FileStore::new(&config.output.output_dir);

    let coordinator = Coordinator::new(config.crawler, fetcher, extractor, store)?;
    Ok(coordinator.run().await)
}

fn error_class(error: &CrawlerError) -> &'static str {
    match error {
        CrawlerError::ListingFetch { .. } | CrawlerError::Extraction { .. } => "fatal_listing",
        _ => "fatal",
    }
}
