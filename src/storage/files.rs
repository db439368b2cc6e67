use crate::crawler::{CrawlTarget, FetchedPage};
use crate::storage::traits::{PageStore, StorageError, StorageResult};
use crate::storage::page_file_name;
use std::path::{Path, PathBuf};

/// Writes each saved page to its own HTML file in an output directory
#[derive(Debug)]
pub struct FileStore {
    output_dir: PathBuf,
    prepared: bool,
}

impl FileStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prepared: false,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl PageStore for FileStore {
    fn prepare(&mut self) -> StorageResult<()> {
        if self.output_dir.exists() {
            if !self.output_dir.is_dir() {
                return Err(StorageError::NotADirectory(self.output_dir.clone()));
            }
        } else {
            std::fs::create_dir_all(&self.output_dir).map_err(|source| {
                StorageError::CreateDir {
                    path: self.output_dir.clone(),
                    source,
                }
            })?;
            tracing::info!("Created output directory: {}", self.output_dir.display());
        }

        self.prepared = true;
        Ok(())
    }

    fn save(
        &mut self,
        index: u32,
        item: &CrawlTarget,
        page: &FetchedPage,
    ) -> StorageResult<PathBuf> {
        if !self.prepared {
            return Err(StorageError::NotPrepared);
        }

        let path = self.output_dir.join(page_file_name(index, item));
        std::fs::write(&path, page.content.as_bytes()).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Saved: {}", path.display());
        Ok(path)
    }
}
