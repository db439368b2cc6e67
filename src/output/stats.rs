//! Statistics for a finished crawl session
//!
//! This module derives display figures from a [`CrawlReport`] and prints
//! them to stdout.

use crate::crawler::CrawlReport;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Pages the session aimed to save
    pub quota: u32,

    /// Detail pages written to the output directory
    pub saved: u32,

    /// Listing pages requested
    pub listing_pages: u32,

    /// Items dropped after a fetch or save failure
    pub failed_items: u32,

    /// Items skipped because their URL was already processed
    pub duplicates_skipped: u32,

    /// Wall-clock duration of the session
    pub elapsed: Duration,

    /// Human-readable stop reason
    pub outcome: String,

    /// Whether the session ended without a fatal error
    pub success: bool,
}

impl CrawlStatistics {
    pub fn from_report(report: &CrawlReport) -> Self {
        Self {
            quota: report.quota,
            saved: report.saved,
            listing_pages: report.listing_pages,
            failed_items: report.failed_items,
            duplicates_skipped: report.duplicates_skipped,
            elapsed: report.elapsed,
            outcome: report.stop.describe(),
            success: report.is_success(),
        }
    }

    /// Share of attempted items that were saved, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.saved + self.failed_items;
        if attempted == 0 {
            0.0
        } else {
            (self.saved as f64 / attempted as f64) * 100.0
        }
    }

    /// Share of the quota that was filled, as a percentage
    pub fn quota_fill(&self) -> f64 {
        if self.quota == 0 {
            0.0
        } else {
            (self.saved as f64 / self.quota as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!(
        "  Pages saved: {} / {} ({:.1}%)",
        stats.saved,
        stats.quota,
        stats.quota_fill()
    );
    println!("  Listing pages: {}", stats.listing_pages);
    println!("  Failed items: {}", stats.failed_items);
    println!("  Duplicate URLs skipped: {}", stats.duplicates_skipped);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} items saved)",
        stats.success_rate(),
        stats.saved,
        stats.saved + stats.failed_items
    );

    if stats.success {
        println!("Finished: {}", stats.outcome);
    } else {
        println!("Stopped early: {}", stats.outcome);
    }
}
