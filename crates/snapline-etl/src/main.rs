//! Snapline ETL - customer snapshot batch loader

use anyhow::Result;
use clap::Parser;
use snapline_common::logging::{init_logging, LogConfig, LogLevel};
use snapline_etl::config::EtlConfig;
use snapline_etl::pipeline::EtlPipeline;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "snapline-etl")]
#[command(author, version, about = "Customer snapshot validation-and-load pipeline")]
struct Cli {
    /// Password-protected input archive (overrides SNAPLINE_ARCHIVE)
    #[arg(short, long)]
    archive: Option<PathBuf>,

    /// Root directory for invalidated/ and validated/ output
    #[arg(short, long)]
    output_root: Option<PathBuf>,

    /// Validation pool width
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    log_config.log_file_prefix = "snapline-etl".to_string();
    init_logging(&log_config)?;

    // Fails fast on a missing secret keyword, before any record is read.
    let mut config = EtlConfig::load()?;
    if let Some(archive) = cli.archive {
        config.archive_path = archive;
    }
    if let Some(output_root) = cli.output_root {
        config.output_root = output_root;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }

    let result = EtlPipeline::new(&config).run().await?;

    info!(
        read = result.read,
        accepted = result.accepted,
        quarantined = result.quarantined,
        staged = result.staged,
        affected_rows = result.affected_rows,
        "ETL complete"
    );
    Ok(())
}
