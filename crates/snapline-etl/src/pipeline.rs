//! End-to-end ETL pipeline
//!
//! Orchestrates one batch run: archive read, concurrent validation with
//! quarantine, deduplication, CSV materialization, staging-table upsert.
//! The whole batch either completes or the run fails; there is no
//! partial-batch resume.

use std::path::PathBuf;

use tracing::{info, warn};

use snapline_common::Result;

use crate::config::EtlConfig;
use crate::quarantine::QuarantineSink;
use crate::{archive, artifact, batch, bucket, dedup, upsert};

/// Counts and artifacts from the file-side phases of a run.
#[derive(Debug)]
pub struct StagedBatch {
    /// Record lines read from the archive entry
    pub read: usize,
    /// Records accepted by validation (pre-dedup)
    pub accepted: usize,
    /// Records quarantined
    pub quarantined: usize,
    /// Deduplicated records written to the CSV artifact
    pub staged: usize,
    /// The CSV artifact fed to the upsert engine
    pub csv_path: PathBuf,
}

/// Result of a full run.
#[derive(Debug)]
pub struct PipelineResult {
    pub read: usize,
    pub accepted: usize,
    pub quarantined: usize,
    pub staged: usize,
    /// Rows affected by the merge statement; 0 when the load was skipped
    /// because no record survived validation.
    pub affected_rows: u64,
}

/// One-batch ETL pipeline over an explicit configuration.
pub struct EtlPipeline<'a> {
    config: &'a EtlConfig,
}

impl<'a> EtlPipeline<'a> {
    pub fn new(config: &'a EtlConfig) -> Self {
        Self { config }
    }

    /// Run the file-side phases: read, validate, dedup, materialize CSV.
    ///
    /// Every quarantine entry has been durably appended by the time this
    /// returns.
    pub async fn stage(&self) -> Result<StagedBatch> {
        let time_bucket = bucket::current_minute_prefix();

        info!("Phase 1: Reading archive");
        let lines = archive::read_record_lines(
            &self.config.archive_path,
            &self.config.data_entry,
            &self.config.archive_password,
        )?;
        let read = lines.len();

        info!(records = read, "Phase 2: Validating records");
        let sink = QuarantineSink::new(&self.config.output_root, &time_bucket);
        let accepted = batch::process_records(lines, &sink, self.config.concurrency).await?;
        let quarantined = read - accepted.len();
        let accepted_count = accepted.len();

        info!("Phase 3: Deduplicating");
        let staged_records = dedup::dedup_snapshots(accepted)?;

        info!("Phase 4: Writing CSV artifact");
        let csv_path =
            artifact::write_csv(&staged_records, &self.config.output_root, &time_bucket)?;

        Ok(StagedBatch {
            read,
            accepted: accepted_count,
            quarantined,
            staged: staged_records.len(),
            csv_path,
        })
    }

    /// Run the whole pipeline including the database load.
    pub async fn run(&self) -> Result<PipelineResult> {
        let staged = self.stage().await?;

        let affected_rows = if staged.staged == 0 {
            warn!("No validated records to load, skipping upsert");
            0
        } else {
            info!("Phase 5: Upserting into {}", self.config.target_table);
            let merge_sql = self.config.load_merge_statement()?;
            upsert::upsert_csv(
                &self.config.db,
                &staged.csv_path,
                &self.config.target_table,
                &merge_sql,
            )
            .await?
        };

        Ok(PipelineResult {
            read: staged.read,
            accepted: staged.accepted,
            quarantined: staged.quarantined,
            staged: staged.staged,
            affected_rows,
        })
    }
}
