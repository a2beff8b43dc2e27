//! adsb-report: decode a binary Mode S capture and write a per-aircraft report.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use adsb_report::config::{self, Config};
use adsb_report::logging::init_logging;
use adsb_report::pipeline;

#[derive(Parser)]
#[command(
    name = "adsb-report",
    version,
    about = "Decode Mode S captures into per-aircraft reports"
)]
struct Cli {
    /// Config file (default: ~/.adsb-report/config.yaml)
    #[arg(long, global = true, env = "ADSB_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a capture in parallel and write the aircraft report
    Run {
        /// Binary capture of 14-byte records
        #[arg(long)]
        input: Option<PathBuf>,

        /// Report destination (replaced on every run)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of decode partitions
        #[arg(long)]
        workers: Option<usize>,

        /// Number of concurrent report appends
        #[arg(long)]
        write_workers: Option<usize>,

        /// Cut partitions on record boundaries
        #[arg(long)]
        aligned: bool,

        /// Timestamp hint passed to the decoder
        #[arg(long)]
        timestamp: Option<u64>,
    },

    /// Decode a capture sequentially and print each message as JSON
    Decode {
        /// Binary capture of 14-byte records
        file: PathBuf,

        /// Timestamp hint passed to the decoder
        #[arg(long, default_value = "1000")]
        timestamp: u64,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration
    Init,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.unwrap_or_else(config::config_file);
    let outcome = match cli.command {
        Commands::Run {
            input,
            output,
            workers,
            write_workers,
            aligned,
            timestamp,
        } => {
            match config::load_config(&config_path) {
                Ok(mut config) => {
                    if let Some(v) = input {
                        config.input = v;
                    }
                    if let Some(v) = output {
                        config.report.path = v;
                    }
                    if let Some(v) = workers {
                        config.decode.workers = v;
                    }
                    if let Some(v) = write_workers {
                        config.report.workers = v;
                    }
                    if let Some(v) = timestamp {
                        config.decode.timestamp = v;
                    }
                    config.decode.aligned |= aligned;
                    pipeline::run(&config).await.map(|_| ())
                }
                Err(e) => Err(e),
            }
        }
        Commands::Decode { file, timestamp } => {
            let stdout = io::stdout();
            pipeline::dump(&file, timestamp, BufWriter::new(stdout.lock()))
                .await
                .map(|_| ())
        }
        Commands::Config {
            action: ConfigAction::Init,
        } => config::save_config(&Config::default(), &config_path).map(|()| {
            info!(path = %config_path.display(), "Config written");
        }),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}
