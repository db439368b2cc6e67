//! Output module for crawl session summaries
//!
//! This module handles:
//! - Deriving statistics from a finished session
//! - Printing the end-of-run summary

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

use crate::crawler::CrawlReport;

/// Prints the summary of a finished session to stdout
pub fn print_report(report: &CrawlReport) {
    print_statistics(&CrawlStatistics::from_report(report));
}
