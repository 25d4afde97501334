//! Bulk-load and persistence adapters behind the record store

use crate::components::{
    error::{LoadResult, StoreError},
    store::record::OrderRecord,
};

pub mod columns;

pub mod journal;

pub mod memory;

pub mod spreadsheet;

pub mod sqlite;

/// An external home for order records.
pub trait OrderSource: Send {
    /// Reads every record, ordered by `id` descending.
    fn load(&mut self) -> LoadResult<Vec<OrderRecord>>;

    /// Durably stores one newly appended record.
    fn persist(&mut self, record: &OrderRecord) -> Result<(), StoreError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Sorts newest first, the order every view presents records in.
pub(crate) fn sort_descending(records: &mut [OrderRecord]) {
    records.sort_by(|a, b| b.id.cmp(&a.id));
}
