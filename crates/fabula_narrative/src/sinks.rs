//! File-backed and in-memory run logs and story stores.

use async_trait::async_trait;
use fabula_error::{FabulaResult, StorageError, StorageErrorKind, StoryError, StoryErrorKind};
use fabula_interface::{RunLog, StoryStore};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Separator written after every log record.
pub const RECORD_SEPARATOR: &str = "\n\n";

/// Append-only run log backed by a text file.
///
/// The file is opened in append mode for every record and never truncated.
#[derive(Debug, Clone)]
pub struct FileRunLog {
    path: PathBuf,
}

impl FileRunLog {
    /// Creates a log appending to `path`. Parent directories are created on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RunLog for FileRunLog {
    #[instrument(skip(self, record), fields(path = %self.path.display(), record_chars = record.len()))]
    async fn append(&self, record: &str) -> FabulaResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::from)?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(StorageError::from)?;

        let mut entry = String::with_capacity(record.len() + RECORD_SEPARATOR.len());
        entry.push_str(record);
        entry.push_str(RECORD_SEPARATOR);

        file.write_all(entry.as_bytes())
            .await
            .map_err(StorageError::from)?;
        file.flush().await.map_err(StorageError::from)?;

        debug!("Appended run log record");
        Ok(())
    }
}

/// Run log that keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryRunLog {
    records: Mutex<Vec<String>>,
}

impl MemoryRunLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records appended so far.
    pub fn records(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RunLog for MemoryRunLog {
    async fn append(&self, record: &str) -> FabulaResult<()> {
        self.records
            .lock()
            .map_err(|e| StoryError::new(StoryErrorKind::LogWrite(e.to_string())))?
            .push(record.to_string());
        Ok(())
    }
}

/// Writes one `story_NNN.txt` file per run into a directory.
#[derive(Debug, Clone)]
pub struct FileStoryStore {
    dir: PathBuf,
}

impl FileStoryStore {
    /// Creates a store writing into `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the artifact for run `run_index` (0-based).
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_narrative::FileStoryStore;
    /// use std::path::Path;
    ///
    /// let store = FileStoryStore::new("stories");
    /// assert_eq!(store.path_for(0), Path::new("stories/story_001.txt"));
    /// ```
    pub fn path_for(&self, run_index: usize) -> PathBuf {
        self.dir.join(format!("story_{:03}.txt", run_index + 1))
    }
}

#[async_trait]
impl StoryStore for FileStoryStore {
    #[instrument(skip(self, text), fields(dir = %self.dir.display(), chars = text.len()))]
    async fn persist(&self, run_index: usize, text: &str) -> FabulaResult<PathBuf> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(StorageError::new(StorageErrorKind::InvalidLocation(format!(
                "{} is not a directory",
                self.dir.display()
            )))
            .into());
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(StorageError::from)?;

        let path = self.path_for(run_index);
        tokio::fs::write(&path, text)
            .await
            .map_err(StorageError::from)?;

        debug!(path = %path.display(), "Story persisted");
        Ok(path)
    }
}

/// Story store that keeps artifacts in memory, keyed by run.
#[derive(Debug, Default)]
pub struct MemoryStoryStore {
    stories: Mutex<Vec<(usize, String)>>,
}

impl MemoryStoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of persisted `(run_index, text)` pairs in write order.
    pub fn stories(&self) -> Vec<(usize, String)> {
        self.stories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl StoryStore for MemoryStoryStore {
    async fn persist(&self, run_index: usize, text: &str) -> FabulaResult<PathBuf> {
        self.stories
            .lock()
            .map_err(|e| StorageError::new(StorageErrorKind::Io(e.to_string())))?
            .push((run_index, text.to_string()));
        Ok(PathBuf::from(format!("memory://story_{:03}", run_index + 1)))
    }
}
