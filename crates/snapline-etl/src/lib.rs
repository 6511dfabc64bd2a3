//! Snapline ETL Library
//!
//! Batch validation-and-load pipeline for customer behavioral snapshots.
//!
//! One run ingests a password-protected archive of newline-delimited JSON
//! records, validates every record concurrently against the snapshot
//! schema, quarantines the invalid ones, deduplicates the survivors, and
//! upserts them into Postgres through a staging-table merge.
//!
//! # Example
//!
//! ```no_run
//! use snapline_etl::config::EtlConfig;
//! use snapline_etl::pipeline::EtlPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EtlConfig::load()?;
//!     let result = EtlPipeline::new(&config).run().await?;
//!     println!("Loaded {} rows", result.affected_rows);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod artifact;
pub mod batch;
pub mod bucket;
pub mod config;
pub mod dedup;
pub mod model;
pub mod pipeline;
pub mod quarantine;
pub mod upsert;
pub mod validate;
