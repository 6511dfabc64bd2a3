//! Minute-granularity output partitioning
//!
//! Quarantine and CSV artifacts for one run land under a
//! `YYYY/MM/DD/HH/mm` prefix keyed by ingestion time, so repeated runs
//! within the same minute append to the same bucket.

use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Relative path prefix for the given timestamp, zero-padded.
pub fn minute_prefix(ts: DateTime<Local>) -> PathBuf {
    PathBuf::from(ts.format("%Y/%m/%d/%H/%M").to_string())
}

/// Prefix for the current wall-clock minute.
pub fn current_minute_prefix() -> PathBuf {
    minute_prefix(Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_minute_prefix_is_zero_padded() {
        let ts = Local.with_ymd_and_hms(2026, 3, 7, 4, 5, 59).unwrap();
        assert_eq!(minute_prefix(ts), PathBuf::from("2026/03/07/04/05"));
    }

    #[test]
    fn test_seconds_do_not_change_bucket() {
        let a = Local.with_ymd_and_hms(2026, 8, 27, 12, 30, 1).unwrap();
        let b = Local.with_ymd_and_hms(2026, 8, 27, 12, 30, 58).unwrap();
        assert_eq!(minute_prefix(a), minute_prefix(b));
    }
}
