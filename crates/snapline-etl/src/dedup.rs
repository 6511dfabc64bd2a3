//! Exact-duplicate removal
//!
//! Two snapshots are duplicates only when every field matches exactly; the
//! first occurrence survives. Keyed on the canonical JSON serialization of
//! the snapshot, which is deterministic for a fixed-shape struct.

use std::collections::HashSet;

use tracing::debug;

use snapline_common::Result;

use crate::model::CustomerSnapshot;

/// Remove exact full-record duplicates, keeping the first occurrence.
pub fn dedup_snapshots(snapshots: Vec<CustomerSnapshot>) -> Result<Vec<CustomerSnapshot>> {
    let total = snapshots.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut unique = Vec::with_capacity(total);

    for snapshot in snapshots {
        if seen.insert(serde_json::to_string(&snapshot)?) {
            unique.push(snapshot);
        }
    }

    debug!(total, unique = unique.len(), "Deduplicated snapshots");
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::zero_snapshot;

    #[test]
    fn test_exact_duplicates_removed() {
        let a = zero_snapshot("c1");
        let b = zero_snapshot("c2");
        let unique = dedup_snapshots(vec![a.clone(), b.clone(), a.clone()]).unwrap();
        assert_eq!(unique, vec![a, b]);
    }

    #[test]
    fn test_same_key_different_fields_both_kept() {
        let a = zero_snapshot("c1");
        let mut b = zero_snapshot("c1");
        b.revenue = 9.5;
        let unique = dedup_snapshots(vec![a, b]).unwrap();
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let rows = vec![
            zero_snapshot("c1"),
            zero_snapshot("c1"),
            zero_snapshot("c2"),
            zero_snapshot("c3"),
            zero_snapshot("c2"),
        ];
        let once = dedup_snapshots(rows).unwrap();
        let twice = dedup_snapshots(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_snapshots(Vec::new()).unwrap().is_empty());
    }
}
