//! Storage module for persisting fetched detail pages
//!
//! This module handles:
//! - The `PageStore` trait the coordinator writes through
//! - The file-per-page `FileStore` backend
//! - Deterministic page file naming

mod files;
mod traits;

pub use files::FileStore;
pub use traits::{PageStore, StorageError, StorageResult};

use crate::crawler::CrawlTarget;

/// Builds the file name for a saved page
///
/// The zero-padded running index keeps names unique and sorted in save order;
/// the labels and reference make them readable. Each component is reduced to
/// `[a-z0-9_-]` so it is safe on any filesystem.
///
/// # Example
///
/// ```
/// use listing_crawler::crawler::CrawlTarget;
/// use listing_crawler::storage::page_file_name;
///
/// let item = CrawlTarget {
///     reference: "123".to_string(),
///     make: "land rover".to_string(),
///     model: "defender".to_string(),
///     url: "https://example.com/used-cars/land-rover/defender/fpa/123".to_string(),
/// };
/// assert_eq!(page_file_name(1, &item), "page_001_land-rover_defender_123.html");
/// ```
pub fn page_file_name(index: u32, item: &CrawlTarget) -> String {
    format!(
        "page_{:03}_{}_{}_{}.html",
        index,
        sanitize_component(&item.make),
        sanitize_component(&item.model),
        sanitize_component(&item.reference)
    )
}

fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}
