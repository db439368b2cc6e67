//! Storage traits and error types
//!
//! This module defines the trait interface for page persistence backends and
//! associated error types.

use crate::crawler::{CrawlTarget, FetchedPage};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output path {0} exists and is not a directory")]
    NotADirectory(PathBuf),

    #[error("Store was not prepared before saving")]
    NotPrepared,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page persistence backends
pub trait PageStore: Send {
    /// Readies the backend for writes; called once at session start
    fn prepare(&mut self) -> StorageResult<()>;

    /// Persists one fetched detail page
    ///
    /// # Arguments
    ///
    /// * `index` - 1-based running index of saved pages this session
    /// * `item` - The item the page belongs to
    /// * `page` - The fetched page
    ///
    /// # Returns
    ///
    /// Where the page was written
    fn save(&mut self, index: u32, item: &CrawlTarget, page: &FetchedPage)
        -> StorageResult<PathBuf>;
}
