//! Record validation
//!
//! Turns one raw NDJSON line into either an accepted [`CustomerSnapshot`]
//! or a structured rejection. Validation is two-pass:
//!
//! 1. Field-level checks (presence, type, range) run for every field and
//!    report all violations together instead of stopping at the first.
//! 2. Cross-field checks run for each rule whose operands parsed in pass 1:
//!    `cancels` and `returns` must not exceed `orders`. A violation rejects
//!    the record.
//!
//! A record whose `days_since_last_order` exceeds `days_since_first_order`
//! is not rejected: both fields are reset to the sentinel `-1` and the
//! record is accepted. The asymmetry between this repair and the
//! order-count rejection is intentional and downstream consumers rely on
//! the sentinel.
//!
//! Validation is pure; it performs no I/O and shares no state between
//! records, so records can be validated on any worker in any order.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use snapline_common::Result;

use crate::model::CustomerSnapshot;

/// Untyped key-value record decoded from one input line. Lives only for
/// the duration of validation.
pub type RawRecord = Map<String, Value>;

/// Why a single field (or field pair) failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Field absent from the record
    Missing,
    /// Present but not of the expected JSON type
    InvalidType,
    /// Numeric field below zero
    Negative,
    /// String field present but empty
    Empty,
    /// `cancels`/`returns` exceeds `orders`
    MoreThanOrders,
}

/// One field-level or cross-field violation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {reason:?}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: Reason,
}

impl ValidationError {
    fn new(field: &'static str, reason: Reason) -> Self {
        Self { field, reason }
    }
}

/// Outcome of validating one raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accepted(CustomerSnapshot),
    /// The original record travels with its errors so the quarantine entry
    /// can reproduce it verbatim.
    Rejected {
        record: RawRecord,
        errors: Vec<ValidationError>,
    },
}

/// Decode and validate one input line.
///
/// A line that is not a JSON object is a fault of the whole run, not a
/// per-record rejection; it propagates as a serialization error.
pub fn validate_line(line: &str) -> Result<Outcome> {
    let record: RawRecord = serde_json::from_str(line)?;
    Ok(validate_record(record))
}

/// Validate one decoded record.
pub fn validate_record(record: RawRecord) -> Outcome {
    let mut fields = FieldReader::new(&record);

    let customer_id = fields.id("customer_id");
    let days_since_first_order = fields.count("days_since_first_order");
    let days_since_last_order = fields.count("days_since_last_order");
    let is_newsletter_subscriber = fields.flag("is_newsletter_subscriber");
    let orders = fields.count("orders");
    let items = fields.count("items");
    let cancels = fields.count("cancels");
    let returns = fields.count("returns");
    let different_addresses = fields.count("different_addresses");
    let shipping_addresses = fields.count("shipping_addresses");
    let devices = fields.count("devices");
    let vouchers = fields.count("vouchers");
    let cc_payments = fields.count("cc_payments");
    let paypal_payments = fields.count("paypal_payments");
    let afterpay_payments = fields.count("afterpay_payments");
    let apple_payments = fields.count("apple_payments");
    let female_items = fields.count("female_items");
    let male_items = fields.count("male_items");
    let unisex_items = fields.count("unisex_items");
    let wapp_items = fields.count("wapp_items");
    let wftw_items = fields.count("wftw_items");
    let mapp_items = fields.count("mapp_items");
    let wacc_items = fields.count("wacc_items");
    let macc_items = fields.count("macc_items");
    let mftw_items = fields.count("mftw_items");
    let wspt_items = fields.count("wspt_items");
    let mspt_items = fields.count("mspt_items");
    let curvy_items = fields.count("curvy_items");
    let sacc_items = fields.count("sacc_items");
    let msite_orders = fields.count("msite_orders");
    let desktop_orders = fields.count("desktop_orders");
    let android_orders = fields.count("android_orders");
    let ios_orders = fields.count("ios_orders");
    let other_device_orders = fields.count("other_device_orders");
    let work_orders = fields.count("work_orders");
    let home_orders = fields.count("home_orders");
    let parcelpoint_orders = fields.count("parcelpoint_orders");
    let other_collection_orders = fields.count("other_collection_orders");
    let average_discount_onoffer = fields.amount("average_discount_onoffer");
    let average_discount_used = fields.amount("average_discount_used");
    let revenue = fields.amount("revenue");

    // Cross-field rules run wherever both operands parsed, so a record with
    // an unrelated field error still reports these violations alongside it.
    if let (Some(orders), Some(cancels)) = (orders, cancels) {
        if cancels > orders {
            fields.errors.push(ValidationError::new("cancels", Reason::MoreThanOrders));
        }
    }
    if let (Some(orders), Some(returns)) = (orders, returns) {
        if returns > orders {
            fields.errors.push(ValidationError::new("returns", Reason::MoreThanOrders));
        }
    }

    // Every helper that returned None also recorded an error, so an empty
    // error list implies every field parsed.
    let candidate = (|| {
        Some(CustomerSnapshot {
            customer_id: customer_id?,
            days_since_first_order: days_since_first_order?,
            days_since_last_order: days_since_last_order?,
            is_newsletter_subscriber: is_newsletter_subscriber?,
            orders: orders?,
            items: items?,
            cancels: cancels?,
            returns: returns?,
            different_addresses: different_addresses?,
            shipping_addresses: shipping_addresses?,
            devices: devices?,
            vouchers: vouchers?,
            cc_payments: cc_payments?,
            paypal_payments: paypal_payments?,
            afterpay_payments: afterpay_payments?,
            apple_payments: apple_payments?,
            female_items: female_items?,
            male_items: male_items?,
            unisex_items: unisex_items?,
            wapp_items: wapp_items?,
            wftw_items: wftw_items?,
            mapp_items: mapp_items?,
            wacc_items: wacc_items?,
            macc_items: macc_items?,
            mftw_items: mftw_items?,
            wspt_items: wspt_items?,
            mspt_items: mspt_items?,
            curvy_items: curvy_items?,
            sacc_items: sacc_items?,
            msite_orders: msite_orders?,
            desktop_orders: desktop_orders?,
            android_orders: android_orders?,
            ios_orders: ios_orders?,
            other_device_orders: other_device_orders?,
            work_orders: work_orders?,
            home_orders: home_orders?,
            parcelpoint_orders: parcelpoint_orders?,
            other_collection_orders: other_collection_orders?,
            average_discount_onoffer: average_discount_onoffer?,
            average_discount_used: average_discount_used?,
            revenue: revenue?,
        })
    })();

    // Releases the reader's borrow of `record` so a rejection can carry
    // the record by value.
    let FieldReader { errors, .. } = fields;

    match (errors.is_empty(), candidate) {
        (true, Some(snapshot)) => Outcome::Accepted(repair_order_dates(snapshot)),
        _ => Outcome::Rejected { record, errors },
    }
}

/// Sentinel-reset for temporally impossible order dates.
///
/// A last order older than the first order is an upstream anomaly worth
/// keeping: both fields become `-1` and the record is accepted unchanged
/// otherwise.
fn repair_order_dates(mut snapshot: CustomerSnapshot) -> CustomerSnapshot {
    if snapshot.days_since_last_order > snapshot.days_since_first_order {
        snapshot.days_since_first_order = -1;
        snapshot.days_since_last_order = -1;
    }
    snapshot
}

/// Extracts typed fields from a raw record, accumulating one error per
/// violated field.
struct FieldReader<'a> {
    record: &'a RawRecord,
    errors: Vec<ValidationError>,
}

impl<'a> FieldReader<'a> {
    fn new(record: &'a RawRecord) -> Self {
        Self {
            record,
            errors: Vec::new(),
        }
    }

    fn fail<T>(&mut self, field: &'static str, reason: Reason) -> Option<T> {
        self.errors.push(ValidationError::new(field, reason));
        None
    }

    /// Non-empty string identity field.
    fn id(&mut self, field: &'static str) -> Option<String> {
        match self.record.get(field) {
            None => self.fail(field, Reason::Missing),
            Some(Value::String(s)) if s.is_empty() => self.fail(field, Reason::Empty),
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => self.fail(field, Reason::InvalidType),
        }
    }

    /// Non-negative integer counter. JSON floats (even integral ones) and
    /// numeric strings are rejected: the schema is strict.
    fn count(&mut self, field: &'static str) -> Option<i64> {
        match self.record.get(field) {
            None => self.fail(field, Reason::Missing),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) if v >= 0 => Some(v),
                Some(_) => self.fail(field, Reason::Negative),
                None => self.fail(field, Reason::InvalidType),
            },
            Some(_) => self.fail(field, Reason::InvalidType),
        }
    }

    /// Boolean flag.
    fn flag(&mut self, field: &'static str) -> Option<bool> {
        match self.record.get(field) {
            None => self.fail(field, Reason::Missing),
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => self.fail(field, Reason::InvalidType),
        }
    }

    /// Non-negative float (monetary or ratio). Integer JSON numbers are
    /// accepted and widened.
    fn amount(&mut self, field: &'static str) -> Option<f64> {
        match self.record.get(field) {
            None => self.fail(field, Reason::Missing),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v >= 0.0 => Some(v),
                Some(_) => self.fail(field, Reason::Negative),
                None => self.fail(field, Reason::InvalidType),
            },
            Some(_) => self.fail(field, Reason::InvalidType),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{json, Value};

    /// JSON object with every snapshot field zeroed, patchable per test.
    pub(crate) fn base_record() -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert("customer_id".into(), json!("c-base"));
        obj.insert("is_newsletter_subscriber".into(), json!(false));
        for field in [
            "days_since_first_order",
            "days_since_last_order",
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
        ] {
            obj.insert(field.into(), json!(0));
        }
        for field in ["average_discount_onoffer", "average_discount_used", "revenue"] {
            obj.insert(field.into(), json!(0.0));
        }
        Value::Object(obj)
    }

    /// `base_record` with per-field overrides applied.
    pub(crate) fn record_json(patches: &[(&str, Value)]) -> Value {
        let mut value = base_record();
        for (field, patch) in patches {
            value[*field] = patch.clone();
        }
        value
    }
}
