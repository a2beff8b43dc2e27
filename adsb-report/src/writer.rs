//! Persist report entries with concurrent appends.
//!
//! The destination is cleared first, then every entry is appended by its
//! own task, at most `workers` at a time. Every append in the process,
//! whichever writer issued it, takes one lock that covers "find end of
//! file" through "write flushed", so two tasks can never land on the same
//! offset. Entry order in the file follows task scheduling.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::OpenOptions;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::aggregate::{ReportEntry, LINE_SEPARATOR};
use crate::error::{PipelineError, Result};

/// Held from end-of-file lookup until the appended bytes are flushed.
static APPEND_LOCK: Mutex<()> = Mutex::const_new(());

pub struct ReportWriter {
    path: PathBuf,
    workers: usize,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>, workers: usize) -> Self {
        ReportWriter {
            path: path.into(),
            workers: workers.max(1),
        }
    }

    /// Remove any previous report. A missing file is already clear.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PipelineError::OutputPrep {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Clear the destination and append every entry.
    pub async fn write(&self, entries: &[ReportEntry]) -> Result<()> {
        self.clear().await?;
        self.append_all(entries).await
    }

    /// Append every entry to whatever the destination already holds.
    ///
    /// All append tasks are awaited even after one fails; the first
    /// failure observed is returned.
    pub async fn append_all(&self, entries: &[ReportEntry]) -> Result<()> {
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        for entry in entries {
            let block = format!("{entry}{LINE_SEPARATOR}");
            let path = self.path.clone();
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| PipelineError::TaskJoin(e.to_string()))?;
                append(&path, block.as_bytes()).await
            });
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(PipelineError::from).and_then(|r| r);
            if let Err(e) = outcome {
                warn!(error = %e, "Report append failed");
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        info!(entries = entries.len(), path = %self.path.display(), "Report written");
        Ok(())
    }
}

async fn append(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source: io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .await
        .map_err(write_err)?;

    let _guard = APPEND_LOCK.lock().await;
    let end = file.metadata().await.map_err(write_err)?.len();
    file.seek(SeekFrom::Start(end)).await.map_err(write_err)?;
    file.write_all(bytes).await.map_err(write_err)?;
    file.flush().await.map_err(write_err)?;
    debug!(offset = end, len = bytes.len(), "Entry appended");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
