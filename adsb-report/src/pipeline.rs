//! End-to-end run: plan → decode → aggregate → write.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use adsb_core::RECORD_SIZE;
use tracing::info;

use crate::aggregate::build_report;
use crate::config::Config;
use crate::coordinator::decode_all;
use crate::error::{PipelineError, Result};
use crate::partition::{plan, plan_aligned};
use crate::writer::ReportWriter;

/// Process-level figures for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub elapsed: Duration,
    pub messages: usize,
    pub emitters: usize,
}

/// Run the whole pipeline. Any failure aborts the run with no report.
///
/// The destination is cleared before decoding starts, so a failed run never
/// leaves an earlier report behind.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let started = Instant::now();
    config.validate()?;

    let writer = ReportWriter::new(&config.report.path, config.report.workers);
    writer.clear().await?;

    let file_size = std::fs::metadata(&config.input)
        .map_err(|source| PipelineError::InputOpen {
            path: config.input.clone(),
            source,
        })?
        .len();
    let partitions = if config.decode.aligned {
        plan_aligned(file_size, config.decode.workers, RECORD_SIZE)
    } else {
        plan(file_size, config.decode.workers)
    };
    info!(
        input = %config.input.display(),
        bytes = file_size,
        workers = config.decode.workers,
        aligned = config.decode.aligned,
        "Planned partitions"
    );

    let messages = decode_all(&config.input, &partitions, config.decode.timestamp).await?;
    let message_count = messages.len();

    let entries = build_report(messages);
    writer.append_all(&entries).await?;

    let summary = RunSummary {
        elapsed: started.elapsed(),
        messages: message_count,
        emitters: entries.len(),
    };
    info!(
        elapsed_ms = summary.elapsed.as_millis() as u64,
        messages = summary.messages,
        aircraft = summary.emitters,
        "Run complete"
    );
    Ok(summary)
}

/// Decode `input` as one partition and write each message to `out` as a
/// JSON line. Returns the number of messages written.
pub async fn dump<W: Write>(input: &Path, timestamp: u64, mut out: W) -> Result<usize> {
    let file_size = std::fs::metadata(input)
        .map_err(|source| PipelineError::InputOpen {
            path: input.to_path_buf(),
            source,
        })?
        .len();
    let messages = decode_all(input, &plan(file_size, 1), timestamp).await?;

    for msg in &messages {
        serde_json::to_writer(&mut out, msg)?;
        out.write_all(b"\n").map_err(PipelineError::Output)?;
    }
    out.flush().map_err(PipelineError::Output)?;

    info!(
        messages = messages.len(),
        ignored_tail = file_size % RECORD_SIZE as u64,
        "Decode complete"
    );
    Ok(messages.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
