use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{info, warn};

use super::{
    columns::{Cell, ColumnMap},
    journal::AppendJournal,
    sort_descending, OrderSource,
};
use crate::components::{
    error::{LoadError, LoadResult, StoreError},
    store::record::OrderRecord,
};

/// Orders read from the first worksheet of an `.xlsx`, `.xls` or `.ods` workbook.
/// The workbook itself is never rewritten; appends go to the optional journal.
#[derive(Debug)]
pub struct SpreadsheetSource {
    path: PathBuf,
    journal: Option<AppendJournal>,
}

impl SpreadsheetSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        SpreadsheetSource {
            path: path.as_ref().to_path_buf(),
            journal: None,
        }
    }

    pub fn with_journal(mut self, path: impl AsRef<Path>) -> Self {
        self.journal = Some(AppendJournal::new(path));
        self
    }

    /// Parses every data row, keeping per-row failures so callers can choose to skip them.
    pub fn read_rows(&self) -> LoadResult<Vec<LoadResult<OrderRecord>>> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoadError::EmptySheet)??;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or(LoadError::EmptySheet)?
            .iter()
            .map(|cell| cell.to_string())
            .collect();
        let columns = ColumnMap::resolve(&headers)?;

        let mut parsed = Vec::new();
        for (idx, row) in rows.enumerate() {
            let cells: Vec<Cell> = row.iter().map(to_cell).collect();
            if cells.iter().all(Cell::is_empty) {
                continue;
            }
            // Header is spreadsheet row 1
            parsed.push(columns.record_from_cells(idx + 2, &cells));
        }
        Ok(parsed)
    }

    /// Strict read of the worksheet: the first malformed row fails the load.
    pub fn read_sheet(&self) -> LoadResult<Vec<OrderRecord>> {
        self.read_rows()?.into_iter().collect()
    }
}

impl OrderSource for SpreadsheetSource {
    fn load(&mut self) -> LoadResult<Vec<OrderRecord>> {
        let mut records = self.read_sheet()?;
        info!(
            "Read {} records from {}",
            records.len(),
            self.path.display()
        );

        if let Some(journal) = &self.journal {
            records.extend(journal.replay()?);
        }
        sort_descending(&mut records);
        Ok(records)
    }

    fn persist(&mut self, record: &OrderRecord) -> Result<(), StoreError> {
        match self.journal.as_mut() {
            Some(journal) => journal.log_record(record),
            None => {
                warn!(
                    "Rejected record {}: {} has no append journal",
                    record.id,
                    self.path.display()
                );
                Err(StoreError::ReadOnly)
            }
        }
    }

    fn describe(&self) -> String {
        match &self.journal {
            Some(journal) => format!(
                "spreadsheet {} (journal {})",
                self.path.display(),
                journal.path().display()
            ),
            None => format!("spreadsheet {}", self.path.display()),
        }
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::Date(value.date()),
            None => Cell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Invalid(format!("{:?}", e)),
    }
}
