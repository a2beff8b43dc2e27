//! Fan out one decode task per partition and merge the results.
//!
//! Every task runs to completion; failures are only looked at once all
//! tasks have joined. Results are concatenated in partition order, which
//! is reproducible but is not the capture's time order.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use adsb_core::Message;
use futures_util::future::join_all;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::partition::Partition;
use crate::worker::decode_partition;

/// Open `input` once and decode all `partitions` concurrently.
pub async fn decode_all(input: &Path, partitions: &[Partition], timestamp: u64) -> Result<Vec<Message>> {
    let file = File::open(input).map_err(|source| PipelineError::InputOpen {
        path: input.to_path_buf(),
        source,
    })?;
    decode_with(Arc::new(file), partitions, timestamp).await
}

/// Decode `partitions` of an already opened file.
pub async fn decode_with(file: Arc<File>, partitions: &[Partition], timestamp: u64) -> Result<Vec<Message>> {
    info!(partitions = partitions.len(), "Starting decode");

    let tasks = partitions.iter().copied().map(|partition| {
        let file = Arc::clone(&file);
        tokio::task::spawn_blocking(move || decode_partition(&file, partition, timestamp))
    });
    let joined = join_all(tasks).await;

    let mut per_partition = Vec::with_capacity(joined.len());
    for result in joined {
        per_partition.push(result??);
    }

    let merged: Vec<Message> = per_partition.into_iter().flatten().collect();
    debug!(messages = merged.len(), "Partitions merged");
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
