//! Quarantine sink for invalid records
//!
//! Rejected records are appended, together with their structured errors, to
//! `invalidated/<YYYY>/<MM>/<DD>/<HH>/<mm>/customers.jsonl`. Entries are
//! write-once: nothing ever rewrites or reorders the file. Each entry is a
//! single `write_all` of one complete line, so appends from interleaved
//! callers stay line-atomic.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::debug;

use snapline_common::Result;

use crate::validate::{RawRecord, ValidationError};

const QUARANTINE_DIR: &str = "invalidated";
const QUARANTINE_FILE: &str = "customers.jsonl";

/// Append-only, minute-partitioned error log.
pub struct QuarantineSink {
    dir: PathBuf,
}

impl QuarantineSink {
    /// Sink for one run's time bucket under the given output root.
    pub fn new(output_root: &Path, bucket: &Path) -> Self {
        Self {
            dir: output_root.join(QUARANTINE_DIR).join(bucket),
        }
    }

    /// Path of the JSONL file this sink appends to.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(QUARANTINE_FILE)
    }

    /// Append one quarantine entry: the original record plus its errors.
    ///
    /// Directory and file creation are idempotent; an I/O failure here is
    /// fatal to the run.
    pub fn record(&self, record: &RawRecord, errors: &[ValidationError]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let entry = json!({
            "record": record,
            "errors": errors,
        });
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_path())?;
        file.write_all(line.as_bytes())?;

        debug!(path = %self.file_path().display(), errors = errors.len(), "Quarantined record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Reason, ValidationError};
    use serde_json::Value;

    fn raw(customer_id: &str) -> RawRecord {
        let mut map = serde_json::Map::new();
        map.insert("customer_id".into(), Value::String(customer_id.into()));
        map
    }

    #[test]
    fn test_entries_append_to_same_minute_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = QuarantineSink::new(tmp.path(), Path::new("2026/08/27/12/30"));
        let errors = vec![ValidationError {
            field: "cancels",
            reason: Reason::MoreThanOrders,
        }];

        sink.record(&raw("c1"), &errors).unwrap();
        sink.record(&raw("c2"), &errors).unwrap();

        let content = fs::read_to_string(sink.file_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["record"]["customer_id"], "c1");
        assert_eq!(first["errors"][0]["field"], "cancels");
        assert_eq!(first["errors"][0]["reason"], "more_than_orders");
    }

    #[test]
    fn test_bucket_directories_created_if_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = QuarantineSink::new(tmp.path(), Path::new("2026/01/02/03/04"));
        sink.record(&raw("c1"), &[]).unwrap();
        assert!(tmp
            .path()
            .join("invalidated/2026/01/02/03/04/customers.jsonl")
            .is_file());
    }
}
