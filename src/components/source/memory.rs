use super::{sort_descending, OrderSource};
use crate::components::{
    error::{LoadResult, StoreError},
    store::record::OrderRecord,
};

/// Records kept in process, used for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<OrderRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<OrderRecord>) -> Self {
        MemorySource { records }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }
}

impl OrderSource for MemorySource {
    fn load(&mut self) -> LoadResult<Vec<OrderRecord>> {
        let mut records = self.records.clone();
        sort_descending(&mut records);
        Ok(records)
    }

    fn persist(&mut self, record: &OrderRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}
