//! adsb-report: parallel decode of Mode S capture files into per-aircraft
//! text reports.
//!
//! file → partition plan → decode workers → merge → group by ICAO →
//! concurrent report appends.

pub mod aggregate;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod partition;
pub mod pipeline;
pub mod worker;
pub mod writer;

#[cfg(test)]
mod fixtures;

pub use aggregate::{build_report, group_by_emitter, EmitterGroup, ReportEntry};
pub use config::Config;
pub use error::{PipelineError, Result};
pub use partition::Partition;
pub use pipeline::{run, RunSummary};
pub use writer::ReportWriter;
