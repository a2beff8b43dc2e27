//! Configuration file management for adsb-report.
//!
//! Reads/writes `~/.adsb-report/config.yaml` with the input capture path,
//! decode worker settings, and report destination. Command-line flags
//! override whatever the file provides.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Full configuration structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub decode: DecodeConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodeConfig {
    /// Number of partitions, one decode task each.
    pub workers: usize,
    /// Cut partitions on record boundaries instead of an even byte split.
    pub aligned: bool,
    /// Timestamp hint handed to the decoder for every record.
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub path: PathBuf,
    /// Concurrent append tasks.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: "data/capture.bin".into(),
            decode: DecodeConfig {
                workers: 3,
                aligned: false,
                timestamp: 1000,
            },
            report: ReportConfig {
                path: "result.txt".into(),
                workers: 5,
            },
        }
    }
}

impl Config {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.decode.workers == 0 {
            return Err(PipelineError::Config("decode.workers must be at least 1".into()));
        }
        if self.report.workers == 0 {
            return Err(PipelineError::Config("report.workers must be at least 1".into()));
        }
        Ok(())
    }
}

/// Get the config file path (`~/.adsb-report/config.yaml`).
pub fn config_file() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".adsb-report")
        .join("config.yaml")
}

/// Load config from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
    parse_config(&text)
}

/// Write `config` to `path`, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| PipelineError::Config(e.to_string()))?;
    }
    std::fs::write(path, serialize_config(config))
        .map_err(|e| PipelineError::Config(e.to_string()))
}

/// Parse simple YAML-like config text.
fn parse_config(text: &str) -> Result<Config> {
    let mut config = Config::default();
    let mut section: Option<&str> = None;

    for (lineno, line) in text.lines().enumerate() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }
        let Some((key, val)) = stripped.split_once(':') else {
            continue;
        };
        let (key, val) = (key.trim(), val.trim());
        let indented = line.starts_with("  ") || line.starts_with('\t');

        if !indented {
            section = val.is_empty().then_some(key);
            continue;
        }

        let bad = |what: &str| PipelineError::Config(format!("line {}: invalid {what}: {val}", lineno + 1));
        match (section, key) {
            (Some("input"), "path") => {
                if let Some(v) = parse_string_value(val) {
                    config.input = v.into();
                }
            }
            (Some("decode"), "workers") => {
                config.decode.workers = val.parse().map_err(|_| bad("decode.workers"))?;
            }
            (Some("decode"), "aligned") => {
                config.decode.aligned = val.parse().map_err(|_| bad("decode.aligned"))?;
            }
            (Some("decode"), "timestamp") => {
                config.decode.timestamp = val.parse().map_err(|_| bad("decode.timestamp"))?;
            }
            (Some("report"), "path") => {
                if let Some(v) = parse_string_value(val) {
                    config.report.path = v.into();
                }
            }
            (Some("report"), "workers") => {
                config.report.workers = val.parse().map_err(|_| bad("report.workers"))?;
            }
            _ => {}
        }
    }

    Ok(config)
}

fn parse_string_value(val: &str) -> Option<String> {
    if val == "null" || val == "~" || val.is_empty() {
        return None;
    }
    let quoted = (val.starts_with('"') && val.ends_with('"'))
        || (val.starts_with('\'') && val.ends_with('\''));
    if quoted && val.len() >= 2 {
        return Some(val[1..val.len() - 1].to_string());
    }
    Some(val.to_string())
}

/// Serialize config to YAML-like text.
fn serialize_config(config: &Config) -> String {
    let lines = [
        "# adsb-report configuration".to_string(),
        String::new(),
        "input:".into(),
        format!("  path: \"{}\"", config.input.display()),
        String::new(),
        "decode:".into(),
        format!("  workers: {}", config.decode.workers),
        format!("  aligned: {}", config.decode.aligned),
        format!("  timestamp: {}", config.decode.timestamp),
        String::new(),
        "report:".into(),
        format!("  path: \"{}\"", config.report.path.display()),
        format!("  workers: {}", config.report.workers),
    ];
    lines.join("\n") + "\n"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
