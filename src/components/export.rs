use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::components::{
    error::ExportError,
    store::{
        record::{OrderRecord, COLUMNS},
        value_type::ValueType,
    },
};

/// Writes records to a new `.xlsx` workbook with the superstore header names,
/// so the file can be loaded back as a spreadsheet source.
pub fn export_xlsx(records: &[OrderRecord], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, column) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, column.header)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, column) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            match record.get_field(column.name) {
                Some(ValueType::Str(s)) => {
                    worksheet.write_string(row, col, s)?;
                }
                Some(ValueType::Int(i)) => {
                    worksheet.write_number(row, col, i as f64)?;
                }
                Some(ValueType::Float(f)) => {
                    worksheet.write_number(row, col, f)?;
                }
                Some(ValueType::Date(d)) => {
                    worksheet.write_string(row, col, d.format("%Y-%m-%d").to_string())?;
                }
                None => {}
            }
        }
    }

    workbook.save(path.as_ref())?;
    info!(
        "Exported {} records to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}
