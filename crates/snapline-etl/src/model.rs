//! Customer snapshot domain model

use serde::{Deserialize, Serialize};

/// One validated customer behavioral record, ready for load.
///
/// Field declaration order is load-bearing: it is the column order of the
/// CSV artifact, and the merge statement matches staging columns to the
/// target table by these names.
///
/// All integer fields are validated non-negative on ingest. The two
/// `days_since_*` fields may additionally hold the sentinel `-1`, which
/// flags a record whose last order predated its first order (see
/// [`crate::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub customer_id: String,
    pub days_since_first_order: i64,
    pub days_since_last_order: i64,
    pub is_newsletter_subscriber: bool,
    pub orders: i64,
    pub items: i64,
    pub cancels: i64,
    pub returns: i64,
    pub different_addresses: i64,
    pub shipping_addresses: i64,
    pub devices: i64,
    pub vouchers: i64,
    pub cc_payments: i64,
    pub paypal_payments: i64,
    pub afterpay_payments: i64,
    pub apple_payments: i64,
    pub female_items: i64,
    pub male_items: i64,
    pub unisex_items: i64,
    pub wapp_items: i64,
    pub wftw_items: i64,
    pub mapp_items: i64,
    pub wacc_items: i64,
    pub macc_items: i64,
    pub mftw_items: i64,
    pub wspt_items: i64,
    pub mspt_items: i64,
    pub curvy_items: i64,
    pub sacc_items: i64,
    pub msite_orders: i64,
    pub desktop_orders: i64,
    pub android_orders: i64,
    pub ios_orders: i64,
    pub other_device_orders: i64,
    pub work_orders: i64,
    pub home_orders: i64,
    pub parcelpoint_orders: i64,
    pub other_collection_orders: i64,
    pub average_discount_onoffer: f64,
    pub average_discount_used: f64,
    pub revenue: f64,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::CustomerSnapshot;

    /// An all-zero snapshot for building test fixtures.
    pub(crate) fn zero_snapshot(customer_id: &str) -> CustomerSnapshot {
        CustomerSnapshot {
            customer_id: customer_id.to_string(),
            days_since_first_order: 0,
            days_since_last_order: 0,
            is_newsletter_subscriber: false,
            orders: 0,
            items: 0,
            cancels: 0,
            returns: 0,
            different_addresses: 0,
            shipping_addresses: 0,
            devices: 0,
            vouchers: 0,
            cc_payments: 0,
            paypal_payments: 0,
            afterpay_payments: 0,
            apple_payments: 0,
            female_items: 0,
            male_items: 0,
            unisex_items: 0,
            wapp_items: 0,
            wftw_items: 0,
            mapp_items: 0,
            wacc_items: 0,
            macc_items: 0,
            mftw_items: 0,
            wspt_items: 0,
            mspt_items: 0,
            curvy_items: 0,
            sacc_items: 0,
            msite_orders: 0,
            desktop_orders: 0,
            android_orders: 0,
            ios_orders: 0,
            other_device_orders: 0,
            work_orders: 0,
            home_orders: 0,
            parcelpoint_orders: 0,
            other_collection_orders: 0,
            average_discount_onoffer: 0.0,
            average_discount_used: 0.0,
            revenue: 0.0,
        }
    }
}
