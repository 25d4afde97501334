//! Header resolution and cell coercion shared by the tabular sources

use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::components::{
    error::{LoadError, LoadResult},
    store::{
        record::{parse_date, FieldType, OrderRecord, COLUMNS},
        value_type::ValueType,
    },
};

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").expect("header pattern compiles");
}

// Header spellings seen in the superstore exports
const ALIASES: [(&str, &str); 4] = [
    ("row_id", "id"),
    ("ship_mode", "delivery_mode"),
    ("ship_date", "dispatch_date"),
    ("sub_category_name", "sub_category"),
];

/// A raw cell before it is coerced into a column type.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Invalid(String), // Error cells such as #DIV/0!
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// Lowercases and collapses separators: `State/Province` -> `state_province`.
pub fn normalize_header(header: &str) -> String {
    let lowered = header.trim().to_lowercase();
    let collapsed = NON_ALNUM.replace_all(&lowered, "_");
    let name = collapsed.trim_matches('_');
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Position of every schema column within a source's header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    positions: Vec<usize>, // Indexed like COLUMNS
}

impl ColumnMap {
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> LoadResult<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| normalize_header(h.as_ref()))
            .collect();

        let positions = COLUMNS
            .iter()
            .map(|column| {
                normalized
                    .iter()
                    .position(|h| h == column.name)
                    .ok_or_else(|| LoadError::MissingColumn(column.name.to_string()))
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(ColumnMap { positions })
    }

    /// Builds a record from one data row. `row` is the 1-based position used in errors.
    pub fn record_from_cells(&self, row: usize, cells: &[Cell]) -> LoadResult<OrderRecord> {
        let malformed = |reason: String| LoadError::MalformedRow { row, reason };
        let cell_at = |idx: usize| cells.get(self.positions[idx]).unwrap_or(&Cell::Empty);

        let id = match coerce(FieldType::Integer, cell_at(0)) {
            Ok(Some(ValueType::Int(id))) if id > 0 => id as u64,
            Ok(Some(_)) => return Err(malformed("id must be a positive integer".to_string())),
            Ok(None) => return Err(malformed("id is empty".to_string())),
            Err(reason) => return Err(malformed(format!("id: {}", reason))),
        };

        let mut record = OrderRecord::new(id);
        for (idx, column) in COLUMNS.iter().enumerate().skip(1) {
            match coerce(column.field_type, cell_at(idx)) {
                Ok(Some(value)) => record.set_field(column.name, value),
                Ok(None) => {}
                Err(reason) => return Err(malformed(format!("{}: {}", column.name, reason))),
            }
        }
        Ok(record)
    }
}

/// Converts a cell into the column type. `Ok(None)` is a null cell.
pub fn coerce(field_type: FieldType, cell: &Cell) -> Result<Option<ValueType>, String> {
    if let Cell::Text(s) = cell {
        if s.trim().is_empty() {
            return Ok(None);
        }
    }

    let value = match (field_type, cell) {
        (_, Cell::Empty) => return Ok(None),

        (FieldType::String, Cell::Text(s)) => ValueType::Str(s.trim().to_string()),
        (FieldType::String, Cell::Int(i)) => ValueType::Str(i.to_string()),
        (FieldType::String, Cell::Float(f)) if f.fract() == 0.0 => {
            ValueType::Str(format!("{}", *f as i64))
        }
        (FieldType::String, Cell::Float(f)) => ValueType::Str(f.to_string()),
        (FieldType::String, Cell::Date(d)) => ValueType::Str(d.format("%Y-%m-%d").to_string()),

        (FieldType::Integer, Cell::Int(i)) => ValueType::Int(*i),
        (FieldType::Integer, Cell::Float(f)) if f.fract() == 0.0 => ValueType::Int(*f as i64),
        (FieldType::Integer, Cell::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(ValueType::Int)
            .map_err(|_| format!("'{}' is not an integer", s))?,

        (FieldType::Float, Cell::Int(i)) => ValueType::Float(*i as f64),
        (FieldType::Float, Cell::Float(f)) => ValueType::Float(*f),
        (FieldType::Float, Cell::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(ValueType::Float)
            .map_err(|_| format!("'{}' is not a number", s))?,

        (FieldType::Date, Cell::Date(d)) => ValueType::Date(*d),
        (FieldType::Date, Cell::Int(i)) => ValueType::Date(from_excel_serial(*i as f64)?),
        (FieldType::Date, Cell::Float(f)) => ValueType::Date(from_excel_serial(*f)?),
        (FieldType::Date, Cell::Text(s)) => {
            ValueType::Date(parse_date(s).ok_or_else(|| format!("'{}' is not a date", s))?)
        }

        (expected, other) => return Err(format!("expected {:?}, found {:?}", expected, other)),
    };

    Ok(Some(value))
}

/// Excel serial day numbers count from 1899-12-30.
pub fn from_excel_serial(serial: f64) -> Result<NaiveDate, String> {
    if !serial.is_finite() || serial < 1.0 {
        return Err(format!("{} is not a valid date serial", serial));
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_days(Days::new(serial.floor() as u64)))
        .ok_or_else(|| format!("{} is out of the date range", serial))
}
