use chrono::NaiveDate;
use serde::Serialize;

use crate::components::store::record::OrderRecord;

/// Inclusive order-date range picked on the chart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    /// Undated records never fall inside a window.
    pub fn contains(&self, record: &OrderRecord) -> bool {
        record
            .order_date
            .is_some_and(|d| d >= self.start && d <= self.end)
    }

    pub fn filter<'a>(&self, records: &'a [OrderRecord]) -> Vec<&'a OrderRecord> {
        records.iter().filter(|r| self.contains(r)).collect()
    }
}
