use std::path::{Path, PathBuf};

use rusqlite::{params_from_iter, types::Value, Connection};
use tracing::{debug, error, info};

use super::{columns::Cell, columns::ColumnMap, spreadsheet::SpreadsheetSource, OrderSource};
use crate::components::{
    error::{LoadError, LoadResult, StoreError},
    store::{
        record::{FieldType, OrderRecord, COLUMNS},
        value_type::ValueType,
    },
};

const TABLE: &str = "orders";

/// Orders kept in the relational `orders` table, primary key `id`.
pub struct SqliteSource {
    path: PathBuf,
    conn: Connection,
}

/// Outcome of copying a spreadsheet into the `orders` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

impl SqliteSource {
    /// Opens an existing database. The `orders` table must already exist.
    pub fn open(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        Ok(SqliteSource { path, conn })
    }

    /// Opens or creates a database and makes sure the `orders` table exists.
    pub fn create(path: impl AsRef<Path>) -> LoadResult<Self> {
        let source = Self::open(path)?;
        source.conn.execute_batch(&create_table_sql())?;
        Ok(source)
    }

    fn column_names(&self) -> LoadResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", TABLE))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Copies every valid spreadsheet row into the table in one transaction, ascending by id.
    /// Rows that fail to parse are logged and skipped.
    pub fn import_spreadsheet(&mut self, sheet: &SpreadsheetSource) -> LoadResult<ImportSummary> {
        info!("Starting data load to {}...", self.path.display());

        let mut summary = ImportSummary::default();
        let mut valid = Vec::new();
        for row in sheet.read_rows()? {
            match row {
                Ok(record) => valid.push(record),
                Err(e) => {
                    error!("Error validating row: {}", e);
                    summary.skipped += 1;
                }
            }
        }
        valid.sort_by_key(|r| r.id);
        info!(
            "Data validation complete. {} rows are valid.",
            valid.len()
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert_sql())?;
            for record in &valid {
                debug!("Inserting row: {}", record.id);
                stmt.execute(params_from_iter(row_values(record)))?;
            }
        }
        // Dropping an uncommitted transaction rolls it back
        tx.commit()?;

        summary.inserted = valid.len();
        info!("Data load to database complete.");
        Ok(summary)
    }
}

impl OrderSource for SqliteSource {
    fn load(&mut self) -> LoadResult<Vec<OrderRecord>> {
        let present = self.column_names()?;
        if present.is_empty() {
            return Err(LoadError::MissingColumn(format!("{} table", TABLE)));
        }
        // Validates that every schema column exists
        ColumnMap::resolve(&present)?;

        let select = format!(
            "SELECT {} FROM {} ORDER BY id DESC",
            column_list(),
            TABLE
        );
        let mut stmt = self.conn.prepare(&select)?;
        let rows = stmt.query_map([], |row| {
            (0..COLUMNS.len())
                .map(|idx| row.get::<_, Value>(idx).map(to_cell))
                .collect::<Result<Vec<_>, _>>()
        })?;

        // Cells arrive in COLUMNS order
        let headers: Vec<&str> = COLUMNS.iter().map(|c| c.name).collect();
        let columns = ColumnMap::resolve(&headers)?;

        let mut records = Vec::new();
        for (idx, cells) in rows.enumerate() {
            records.push(columns.record_from_cells(idx + 1, &cells?)?);
        }

        info!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn persist(&mut self, record: &OrderRecord) -> Result<(), StoreError> {
        self.conn
            .execute(&insert_sql(), params_from_iter(row_values(record)))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite {}", self.path.display())
    }
}

fn column_list() -> String {
    COLUMNS
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_sql() -> String {
    let placeholders = vec!["?"; COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE,
        column_list(),
        placeholders
    )
}

fn create_table_sql() -> String {
    let definitions = COLUMNS
        .iter()
        .map(|c| {
            let sql_type = match c.field_type {
                FieldType::Integer => "INTEGER",
                FieldType::Float => "FLOAT",
                FieldType::String => "VARCHAR",
                FieldType::Date => "DATE",
            };
            if c.name == "id" {
                format!("{} {} NOT NULL PRIMARY KEY", c.name, sql_type)
            } else {
                format!("{} {}", c.name, sql_type)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({});", TABLE, definitions)
}

fn row_values(record: &OrderRecord) -> Vec<Value> {
    COLUMNS
        .iter()
        .map(|c| match record.get_field(c.name) {
            Some(ValueType::Str(s)) => Value::Text(s),
            Some(ValueType::Int(i)) => Value::Integer(i),
            Some(ValueType::Float(f)) => Value::Real(f),
            Some(ValueType::Date(d)) => Value::Text(d.format("%Y-%m-%d").to_string()),
            None => Value::Null,
        })
        .collect()
}

fn to_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Integer(i) => Cell::Int(i),
        Value::Real(f) => Cell::Float(f),
        Value::Text(s) => Cell::Text(s),
        Value::Blob(_) => Cell::Invalid("blob".to_string()),
    }
}
