//! Error type for the decode-and-report pipeline.
//!
//! Every variant is fatal: the pipeline never retries and never produces a
//! partial report.

use std::path::PathBuf;

use adsb_core::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(String),
    #[error("cannot open input {path}: {source}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read failed for partition {index}: {source}")]
    PartitionRead {
        index: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("decode failed in partition {partition} at byte {offset}: {source}")]
    Decode {
        partition: usize,
        offset: u64,
        #[source]
        source: DecodeError,
    },
    #[error("cannot clear output {path}: {source}")]
    OutputPrep {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("append to {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("cannot write decoded messages: {0}")]
    Output(#[source] std::io::Error),
    #[error("task failed to complete: {0}")]
    TaskJoin(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::TaskJoin(err.to_string())
    }
}
