//! Staging-table upsert against Postgres
//!
//! The load protocol, executed inside one transaction:
//!
//! 1. `CREATE TEMP TABLE tmp_table (LIKE <target> INCLUDING DEFAULTS)`
//! 2. `COPY tmp_table (<csv header columns>) FROM STDIN` with CSV format,
//!    header row, `,` delimiter, empty string as null
//! 3. execute the externally supplied merge statement verbatim
//! 4. commit
//!
//! Any failure after `BEGIN` rolls the transaction back; the temp table is
//! session-scoped and disappears with it, so nothing leaks into later
//! operations. Nobody outside this module may reference `tmp_table`.

use std::path::Path;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{error, info};

use snapline_common::{EtlError, Result};

use crate::config::DbConfig;

/// Connection-scoped staging table name. The merge statement selects from
/// this name.
pub const STAGING_TABLE: &str = "tmp_table";

/// Staging DDL mirroring the target's column defaults.
pub fn create_staging_statement(target_table: &str) -> String {
    format!("CREATE TEMP TABLE {STAGING_TABLE} (LIKE {target_table} INCLUDING DEFAULTS)")
}

/// COPY statement matching staging columns positionally to the CSV header.
pub fn copy_statement(header: &str) -> String {
    format!(
        "COPY {STAGING_TABLE} ({header}) FROM STDIN \
         WITH (FORMAT CSV, HEADER TRUE, DELIMITER ',', NULL '')"
    )
}

/// Bulk-load the CSV artifact into a staging table and merge it into
/// `target_table` with the caller-supplied statement.
///
/// Returns the number of rows the merge affected. Connection failure is
/// fatal and propagated immediately; there are no retries at this layer.
pub async fn upsert_csv(
    db: &DbConfig,
    csv_path: &Path,
    target_table: &str,
    merge_sql: &str,
) -> Result<u64> {
    let csv_bytes = std::fs::read(csv_path).map_err(|e| {
        error!(path = %csv_path.display(), "Could not read staging CSV: {}", e);
        EtlError::Io(e)
    })?;
    let header = csv_header(&csv_bytes)
        .ok_or_else(|| EtlError::Csv(format!("{} has no header row", csv_path.display())))?;

    let options = PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .username(&db.user)
        .password(&db.password)
        .database(&db.dbname);

    let mut conn = PgConnection::connect_with(&options).await.map_err(|e| {
        error!(host = %db.host, port = db.port, "Failed to connect: {}", e);
        EtlError::Store(format!("Failed to connect to {}: {}", db.host, e))
    })?;

    let mut tx = conn
        .begin()
        .await
        .map_err(|e| EtlError::Store(format!("Failed to open transaction: {e}")))?;

    let create_stmt = create_staging_statement(target_table);
    sqlx::query(&create_stmt)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Query failed:\n{}", create_stmt);
            EtlError::Store(format!("Staging table creation failed: {e}"))
        })?;

    let copy_stmt = copy_statement(&header);
    let copied = bulk_load(&mut tx, &copy_stmt, &csv_bytes).await.map_err(|e| {
        error!("Copy query failed:\n{}", copy_stmt);
        EtlError::Store(format!("Bulk load failed: {e}"))
    })?;

    let merged = sqlx::query(merge_sql).execute(&mut *tx).await.map_err(|e| {
        error!("Query failed:\n{}", merge_sql);
        EtlError::Store(format!("Merge statement failed: {e}"))
    })?;
    let affected = merged.rows_affected();

    tx.commit()
        .await
        .map_err(|e| EtlError::Store(format!("Commit failed: {e}")))?;

    info!(
        table = %target_table,
        staged_rows = copied,
        affected_rows = affected,
        "Upsert complete"
    );
    Ok(affected)
}

/// Stream the CSV bytes through the COPY protocol; returns rows staged.
async fn bulk_load(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    copy_stmt: &str,
    csv_bytes: &[u8],
) -> std::result::Result<u64, sqlx::Error> {
    let mut sink = tx.copy_in_raw(copy_stmt).await?;
    sink.send(csv_bytes).await?;
    sink.finish().await
}

/// First line of the artifact, stripped of any carriage return.
fn csv_header(csv_bytes: &[u8]) -> Option<String> {
    let line_end = csv_bytes.iter().position(|b| *b == b'\n')?;
    let header = String::from_utf8_lossy(&csv_bytes[..line_end]);
    let header = header.trim_end_matches('\r');
    if header.is_empty() {
        None
    } else {
        Some(header.to_string())
    }
}
