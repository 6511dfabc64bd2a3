//! Validated CSV artifact
//!
//! The deduplicated batch is materialized as
//! `validated/<YYYY>/<MM>/<DD>/<HH>/<mm>/customers.csv` before load. The
//! header row names the snapshot fields in declaration order and doubles
//! as the column list for the staging-table COPY; empty cells represent
//! null.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use snapline_common::{EtlError, Result};

use crate::model::CustomerSnapshot;

const VALIDATED_DIR: &str = "validated";
const ARTIFACT_FILE: &str = "customers.csv";

/// Directory the artifact for `bucket` lands in.
pub fn artifact_dir(output_root: &Path, bucket: &Path) -> PathBuf {
    output_root.join(VALIDATED_DIR).join(bucket)
}

/// Write the batch to its bucketed CSV file and return the file path.
///
/// The header row is written even for an empty batch so the artifact is
/// always well-formed.
pub fn write_csv(records: &[CustomerSnapshot], output_root: &Path, bucket: &Path) -> Result<PathBuf> {
    let dir = artifact_dir(output_root, bucket);
    fs::create_dir_all(&dir)?;
    let path = dir.join(ARTIFACT_FILE);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .map_err(|e| EtlError::Csv(e.to_string()))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| EtlError::Csv(e.to_string()))?;
    }
    if records.is_empty() {
        writer
            .write_record(header_fields())
            .map_err(|e| EtlError::Csv(e.to_string()))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "Wrote validated CSV artifact");
    Ok(path)
}

/// Snapshot field names in declaration (and CSV column) order.
pub fn header_fields() -> [&'static str; 41] {
    [
        "customer_id",
        "days_since_first_order",
        "days_since_last_order",
        "is_newsletter_subscriber",
        "orders",
        "items",
        "cancels",
        "returns",
        "different_addresses",
        "shipping_addresses",
        "devices",
        "vouchers",
        "cc_payments",
        "paypal_payments",
        "afterpay_payments",
        "apple_payments",
        "female_items",
        "male_items",
        "unisex_items",
        "wapp_items",
        "wftw_items",
        "mapp_items",
        "wacc_items",
        "macc_items",
        "mftw_items",
        "wspt_items",
        "mspt_items",
        "curvy_items",
        "sacc_items",
        "msite_orders",
        "desktop_orders",
        "android_orders",
        "ios_orders",
        "other_device_orders",
        "work_orders",
        "home_orders",
        "parcelpoint_orders",
        "other_collection_orders",
        "average_discount_onoffer",
        "average_discount_used",
        "revenue",
    ]
}
