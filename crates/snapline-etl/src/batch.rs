//! Concurrent batch validation
//!
//! Fans raw record lines out to a bounded pool of blocking workers, routes
//! rejections to the quarantine sink, and collects accepted snapshots.
//!
//! Ordering contract: accepted snapshots come back in completion order, not
//! input order. Callers must not depend on input-order preservation.
//!
//! Every quarantine write happens on the collector, before the next result
//! is polled, so each rejection is durably recorded exactly once before
//! this function returns. One record's validation failure never aborts the
//! batch; only decode faults, sink I/O faults, and worker panics do.

use futures::stream::{self, StreamExt};
use tokio::task;
use tracing::{debug, warn};

use snapline_common::{EtlError, Result};

use crate::model::CustomerSnapshot;
use crate::quarantine::QuarantineSink;
use crate::validate::{self, Outcome};

/// Validate all lines with at most `concurrency` workers in flight.
///
/// Returns only after every submitted record has completed. Rejected
/// records have been appended to `sink` by then.
pub async fn process_records(
    lines: Vec<String>,
    sink: &QuarantineSink,
    concurrency: usize,
) -> Result<Vec<CustomerSnapshot>> {
    let submitted = lines.len();
    let width = concurrency.max(1);

    // Validation is CPU-bound and pure, so each record goes to a blocking
    // worker; buffer_unordered caps how many are in flight and yields
    // results as workers finish.
    let mut outcomes = stream::iter(
        lines
            .into_iter()
            .map(|line| task::spawn_blocking(move || validate::validate_line(&line))),
    )
    .buffer_unordered(width);

    let mut accepted = Vec::with_capacity(submitted);
    let mut quarantined = 0usize;

    while let Some(joined) = outcomes.next().await {
        let outcome = joined.map_err(|e| EtlError::Task(e.to_string()))??;
        match outcome {
            Outcome::Accepted(snapshot) => accepted.push(snapshot),
            Outcome::Rejected { record, errors } => {
                sink.record(&record, &errors)?;
                quarantined += 1;
            },
        }
    }

    if quarantined > 0 {
        warn!(quarantined, "Records failed validation and were quarantined");
    }
    debug!(submitted, accepted = accepted.len(), quarantined, "Batch validation finished");

    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::test_support::record_json;
    use serde_json::json;
    use std::collections::HashSet;
    use std::path::Path;

    fn lines() -> Vec<String> {
        vec![
            record_json(&[("customer_id", json!("c1")), ("orders", json!(3))]).to_string(),
            // invalid: cancels > orders
            record_json(&[
                ("customer_id", json!("c2")),
                ("orders", json!(1)),
                ("cancels", json!(2)),
            ])
            .to_string(),
            record_json(&[("customer_id", json!("c3"))]).to_string(),
            // invalid: negative counter
            record_json(&[("customer_id", json!("c4")), ("items", json!(-1))]).to_string(),
            record_json(&[("customer_id", json!("c5"))]).to_string(),
        ]
    }

    fn accepted_ids(snapshots: &[CustomerSnapshot]) -> HashSet<String> {
        snapshots.iter().map(|s| s.customer_id.clone()).collect()
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = QuarantineSink::new(tmp.path(), Path::new("2026/08/27/10/00"));

        let accepted = process_records(lines(), &sink, 4).await.unwrap();

        assert_eq!(
            accepted_ids(&accepted),
            HashSet::from(["c1".to_string(), "c3".to_string(), "c5".to_string()])
        );

        let quarantine = std::fs::read_to_string(sink.file_path()).unwrap();
        assert_eq!(quarantine.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_width_does_not_change_outcomes() {
        let tmp_serial = tempfile::tempdir().unwrap();
        let tmp_wide = tempfile::tempdir().unwrap();
        let bucket = Path::new("2026/08/27/10/00");

        let serial_sink = QuarantineSink::new(tmp_serial.path(), bucket);
        let wide_sink = QuarantineSink::new(tmp_wide.path(), bucket);

        let serial = process_records(lines(), &serial_sink, 1).await.unwrap();
        let wide = process_records(lines(), &wide_sink, 4).await.unwrap();

        // Same outcome sets; order may differ.
        assert_eq!(accepted_ids(&serial), accepted_ids(&wide));

        let serial_q = std::fs::read_to_string(serial_sink.file_path()).unwrap();
        let wide_q = std::fs::read_to_string(wide_sink.file_path()).unwrap();
        assert_eq!(serial_q.lines().count(), wide_q.lines().count());
    }

    #[tokio::test]
    async fn test_malformed_line_aborts_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = QuarantineSink::new(tmp.path(), Path::new("2026/08/27/10/00"));

        let mut bad = lines();
        bad.push("{truncated".to_string());

        assert!(process_records(bad, &sink, 4).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = QuarantineSink::new(tmp.path(), Path::new("2026/08/27/10/00"));

        let accepted = process_records(Vec::new(), &sink, 4).await.unwrap();
        assert!(accepted.is_empty());
        assert!(!sink.file_path().exists());
    }

    #[tokio::test]
    async fn test_zero_width_clamped_to_one() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = QuarantineSink::new(tmp.path(), Path::new("2026/08/27/10/00"));

        let accepted = process_records(lines(), &sink, 0).await.unwrap();
        assert_eq!(accepted.len(), 3);
    }
}
