use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use tracing::{info, warn};

use super::{
    record::OrderRecord,
    schema::{OrderRecordInput, ORDER_SCHEMA},
};
use crate::components::{
    error::{LoadError, LoadResult, StoreError},
    source::OrderSource,
};

/// The full set of order records, loaded once and shared by every view.
/// Readers take snapshots; appends are serialized through the source lock.
pub struct RecordStore {
    records: Arc<RwLock<BTreeMap<u64, OrderRecord>>>, // Keyed by id
    source: Mutex<Box<dyn OrderSource>>,              // Also the single mutation lock
}

impl RecordStore {
    /// Bulk-loads every record from the source.
    pub fn open(source: impl OrderSource + 'static) -> LoadResult<Self> {
        Self::open_boxed(Box::new(source))
    }

    pub fn open_boxed(mut source: Box<dyn OrderSource>) -> LoadResult<Self> {
        let loaded = source.load()?;

        let mut records = BTreeMap::new();
        for record in loaded {
            let id = record.id;
            if records.insert(id, record).is_some() {
                return Err(LoadError::DuplicateId(id));
            }
        }

        let dispatch_anomalies = records
            .values()
            .filter(|r| r.days_to_ship().is_some_and(|days| days < 0))
            .count();
        if dispatch_anomalies > 0 {
            warn!(
                "{} records were dispatched before they were ordered",
                dispatch_anomalies
            );
        }

        info!("Loaded {} records from {}", records.len(), source.describe());

        Ok(RecordStore {
            records: Arc::new(RwLock::new(records)),
            source: Mutex::new(source),
        })
    }

    /// Every record, newest id first.
    pub fn load(&self) -> Vec<OrderRecord> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.values().rev().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<OrderRecord> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next successful append will be assigned.
    pub fn next_id(&self) -> u64 {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Self::next_id_in(&records)
    }

    fn next_id_in(records: &BTreeMap<u64, OrderRecord>) -> u64 {
        records.keys().next_back().map_or(1, |max| max + 1)
    }

    /// Validates, persists and stores one new record.
    /// On any error the store is left exactly as it was.
    pub fn append(&self, input: OrderRecordInput) -> Result<OrderRecord, StoreError> {
        let values = ORDER_SCHEMA.validate_record(&input.values)?;

        // Held until the record is visible so concurrent appends can't share an id
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);

        let record = {
            let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
            let id = Self::next_id_in(&records);
            let record = OrderRecord::from_values(id, &values);

            if let Some(order_id) = &record.order_id {
                if records
                    .values()
                    .any(|r| r.order_id.as_deref() == Some(order_id.as_str()))
                {
                    return Err(StoreError::DuplicateOrderId(order_id.clone()));
                }
            }
            record
        };

        source.persist(&record)?;

        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id, record.clone());

        info!(
            "Appended record {} (order {})",
            record.id,
            record.order_id.as_deref().unwrap_or("-")
        );
        Ok(record)
    }
}
