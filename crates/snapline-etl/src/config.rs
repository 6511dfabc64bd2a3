//! Configuration management
//!
//! Everything the pipeline needs is resolved once at startup into an
//! explicit [`EtlConfig`] and passed by reference; core components never
//! reach into the environment themselves.

use std::path::PathBuf;

use snapline_common::secret;
use snapline_common::{EtlError, Result};

// ============================================================================
// Pipeline Configuration Constants
// ============================================================================

/// Default input archive path.
pub const DEFAULT_ARCHIVE_PATH: &str = "test_data.zip";

/// Name of the NDJSON entry inside the archive.
pub const DEFAULT_DATA_ENTRY: &str = "data.json";

/// Default root for `invalidated/` and `validated/` output trees.
pub const DEFAULT_OUTPUT_ROOT: &str = ".";

/// Default validation pool width.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default upsert target table.
pub const DEFAULT_TARGET_TABLE: &str = "dev.customers";

/// Default path of the externally supplied merge statement.
pub const DEFAULT_MERGE_SQL_PATH: &str = "sql/load_customers.sql";

/// Postgres connection parameters.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            dbname: "public".to_string(),
        }
    }
}

/// Full pipeline configuration for one run.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    /// Password-protected input archive.
    pub archive_path: PathBuf,
    /// NDJSON entry name inside the archive.
    pub data_entry: String,
    /// Derived archive password (never the raw keyword).
    pub archive_password: String,
    /// Root directory for quarantine and CSV output.
    pub output_root: PathBuf,
    /// Validation pool width.
    pub concurrency: usize,
    pub db: DbConfig,
    /// Upsert target table identifier, schema-qualified.
    pub target_table: String,
    /// File holding the merge statement executed against the staging table.
    pub merge_sql_path: PathBuf,
}

impl EtlConfig {
    /// Load configuration from environment and defaults.
    ///
    /// The secret keyword is mandatory; everything else falls back to a
    /// default. Fails before any record is read when the keyword is absent.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let archive_password = secret::derive_archive_password()?;

        Ok(Self {
            archive_path: env_or("SNAPLINE_ARCHIVE", DEFAULT_ARCHIVE_PATH).into(),
            data_entry: env_or("SNAPLINE_DATA_ENTRY", DEFAULT_DATA_ENTRY),
            archive_password,
            output_root: env_or("SNAPLINE_OUTPUT_ROOT", DEFAULT_OUTPUT_ROOT).into(),
            concurrency: std::env::var("SNAPLINE_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONCURRENCY),
            db: DbConfig {
                host: env_or("SNAPLINE_DB_HOST", "localhost"),
                port: std::env::var("SNAPLINE_DB_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5432),
                user: env_or("SNAPLINE_DB_USER", "postgres"),
                password: env_or("SNAPLINE_DB_PASSWORD", "postgres"),
                dbname: env_or("SNAPLINE_DB_NAME", "public"),
            },
            target_table: env_or("SNAPLINE_TARGET_TABLE", DEFAULT_TARGET_TABLE),
            merge_sql_path: env_or("SNAPLINE_MERGE_SQL", DEFAULT_MERGE_SQL_PATH).into(),
        })
    }

    /// Read the externally supplied merge statement.
    ///
    /// The statement is a collaborator, not something this pipeline
    /// generates; a missing or empty file is a configuration error.
    pub fn load_merge_statement(&self) -> Result<String> {
        let sql = std::fs::read_to_string(&self.merge_sql_path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read merge statement {}: {}",
                self.merge_sql_path.display(),
                e
            ))
        })?;

        if sql.trim().is_empty() {
            return Err(EtlError::Config(format!(
                "Merge statement {} is empty",
                self.merge_sql_path.display()
            )));
        }
        Ok(sql)
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}
