use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::{granularity::Granularity, window::DateWindow};
use crate::components::store::record::OrderRecord;

/// Column sums for one calendar period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBucket {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub orders: usize,
    pub days_to_ship: i64,
    pub discount: f64,
    pub profit: f64,
    /// Sum of per-record ratios, kept as the charts have always drawn it.
    pub profit_ratio: f64,
    pub quantity: i64,
    pub sales: f64,
}

impl TimelineBucket {
    fn empty(period_start: NaiveDate, granularity: Granularity) -> Self {
        TimelineBucket {
            period_start,
            period_end: granularity.bucket_end(period_start),
            orders: 0,
            days_to_ship: 0,
            discount: 0.0,
            profit: 0.0,
            profit_ratio: 0.0,
            quantity: 0,
            sales: 0.0,
        }
    }

    // Missing values add nothing. Integer sums clamp at the i64 bounds.
    fn add(&mut self, record: &OrderRecord) {
        self.orders += 1;
        self.days_to_ship = self
            .days_to_ship
            .saturating_add(record.days_to_ship().unwrap_or(0));
        self.discount += record.discount.unwrap_or(0.0);
        self.profit += record.profit.unwrap_or(0.0);
        self.profit_ratio += record.profit_ratio().unwrap_or(0.0);
        self.quantity = self.quantity.saturating_add(record.quantity.unwrap_or(0));
        self.sales += record.sales.unwrap_or(0.0);
    }
}

/// Resamples the window's records into consecutive buckets, first occupied to last.
/// Periods in between with no orders come back as zero rows.
pub fn compute_timeline(
    records: &[OrderRecord],
    window: &DateWindow,
    granularity: Granularity,
) -> Vec<TimelineBucket> {
    let mut occupied: BTreeMap<NaiveDate, TimelineBucket> = BTreeMap::new();
    for record in window.filter(records) {
        let Some(date) = record.order_date else {
            continue;
        };
        let start = granularity.bucket_start(date);
        occupied
            .entry(start)
            .or_insert_with(|| TimelineBucket::empty(start, granularity))
            .add(record);
    }

    let (Some(&first), Some(&last)) = (occupied.keys().next(), occupied.keys().next_back()) else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut cursor = Some(first);
    while let Some(start) = cursor.filter(|s| *s <= last) {
        buckets.push(
            occupied
                .remove(&start)
                .unwrap_or_else(|| TimelineBucket::empty(start, granularity)),
        );
        cursor = granularity.next_start(start);
    }

    debug!(
        "Timeline {}..{} by {}: {} buckets",
        window.start,
        window.end,
        granularity.name(),
        buckets.len()
    );
    buckets
}
