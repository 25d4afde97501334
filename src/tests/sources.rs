#![allow(unused_imports)]
use std::fs;
use std::path::Path;

use rusqlite::Connection;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

use crate::{
    components::{
        error::{LoadError, StoreError},
        export::export_xlsx,
        source::{
            journal::AppendJournal, spreadsheet::SpreadsheetSource, sqlite::SqliteSource,
            OrderSource,
        },
        store::record_store::RecordStore,
    },
    tests::{date, full_record, sample_records, valid_input},
};

const LEGACY_HEADERS: [&str; 20] = [
    "Row ID",
    "Order ID",
    "Order Date",
    "Ship Date",
    "Ship Mode",
    "Customer ID",
    "Customer Name",
    "Segment",
    "City",
    "State/Province",
    "Country/Region",
    "Region",
    "Product ID",
    "Category",
    "Sub-Category",
    "Product Name",
    "Sales",
    "Quantity",
    "Discount",
    "Profit",
];

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

fn write_sheet(path: &Path, headers: &[&str], rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (idx, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let (r, c) = ((idx + 1) as u32, col as u16);
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save(path).unwrap();
}

/// A row in LEGACY_HEADERS order. Order date is an Excel serial, ship date ISO text.
fn legacy_row<'a>(id: f64, order_id: &'a str, sales: Cell<'a>) -> Vec<Cell<'a>> {
    vec![
        Cell::Number(id),
        Cell::Text(order_id),
        Cell::Number(45292.0),
        Cell::Text("2024-01-04"),
        Cell::Text("First Class"),
        Cell::Text("SO-20335"),
        Cell::Text("Sean O'Donnell"),
        Cell::Text("Consumer"),
        Cell::Text("Fort Lauderdale"),
        Cell::Text("Florida"),
        Cell::Text("United States"),
        Cell::Text("South"),
        Cell::Text("OFF-ST-10000760"),
        Cell::Text("Office Supplies"),
        Cell::Text("Storage"),
        Cell::Text("Eldon Fold 'N Roll Cart System"),
        sales,
        Cell::Number(2.0),
        Cell::Number(0.2),
        Cell::Number(2.5164),
    ]
}

#[test]
fn test_exported_spreadsheet_loads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orders.xlsx");
    let records = sample_records();

    export_xlsx(&records, &path).unwrap();

    let mut source = SpreadsheetSource::new(&path);
    let mut loaded = source.load().unwrap();
    assert_eq!(loaded.len(), 6);
    assert_eq!(loaded[0].id, 6);

    loaded.reverse();
    assert_eq!(loaded, records);
}

#[test]
fn test_legacy_headers_and_serial_dates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.xlsx");
    write_sheet(
        &path,
        &LEGACY_HEADERS,
        &[
            legacy_row(1.0, "US-2024-1", Cell::Number(22.368)),
            Vec::new(),
            legacy_row(2.0, "US-2024-2", Cell::Blank),
        ],
    );

    let store = RecordStore::open(SpreadsheetSource::new(&path)).unwrap();
    assert_eq!(store.len(), 2);

    let first = store.get(1).unwrap();
    assert_eq!(first.order_date, Some(date(2024, 1, 1)));
    assert_eq!(first.dispatch_date, Some(date(2024, 1, 4)));
    assert_eq!(first.delivery_mode.as_deref(), Some("First Class"));
    assert_eq!(first.state_province.as_deref(), Some("Florida"));
    assert_eq!(first.sub_category.as_deref(), Some("Storage"));
    assert_eq!(first.sales, Some(22.368));
    assert_eq!(first.quantity, Some(2));
    assert_eq!(first.days_to_ship(), Some(3));

    // Empty cells are nulls
    assert_eq!(store.get(2).unwrap().sales, None);
}

#[test]
fn test_missing_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.xlsx");
    write_sheet(&path, &LEGACY_HEADERS[..19], &[]);

    match SpreadsheetSource::new(&path).load() {
        Err(LoadError::MissingColumn(name)) => assert_eq!(name, "profit"),
        other => panic!("unexpected {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_malformed_row_names_spreadsheet_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("malformed.xlsx");
    write_sheet(
        &path,
        &LEGACY_HEADERS,
        &[
            legacy_row(1.0, "US-2024-1", Cell::Number(10.0)),
            legacy_row(2.0, "US-2024-2", Cell::Text("ten dollars")),
        ],
    );

    match SpreadsheetSource::new(&path).load() {
        Err(LoadError::MalformedRow { row, reason }) => {
            assert_eq!(row, 3);
            assert!(reason.contains("sales"));
        }
        other => panic!("unexpected {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_spreadsheet_without_journal_is_read_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orders.xlsx");
    export_xlsx(&sample_records(), &path).unwrap();

    let store = RecordStore::open(SpreadsheetSource::new(&path)).unwrap();
    assert!(matches!(
        store.append(valid_input("US-2024-200001")),
        Err(StoreError::ReadOnly)
    ));
    assert_eq!(store.len(), 6);
}

#[test]
fn test_journal_replays_appends() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("orders.xlsx");
    let journal = dir.path().join("appends.jsonl");
    export_xlsx(&sample_records(), &sheet).unwrap();

    {
        let store =
            RecordStore::open(SpreadsheetSource::new(&sheet).with_journal(&journal)).unwrap();
        store.append(valid_input("US-2024-200001")).unwrap();
        store.append(valid_input("US-2024-200002")).unwrap();
    }

    let reopened =
        RecordStore::open(SpreadsheetSource::new(&sheet).with_journal(&journal)).unwrap();
    assert_eq!(reopened.len(), 8);
    assert_eq!(reopened.next_id(), 9);
    assert_eq!(
        reopened.get(8).unwrap().order_id.as_deref(),
        Some("US-2024-200002")
    );
    assert_eq!(reopened.get(7).unwrap().profit, Some(6.8714));
}

#[test]
fn test_corrupt_journal_fails_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("appends.jsonl");

    let mut journal = AppendJournal::new(&path);
    journal
        .log_record(&full_record(1, date(2024, 1, 5), 100.0, 20.0))
        .unwrap();
    assert_eq!(journal.replay().unwrap().len(), 1);

    // Tampered sales figure no longer matches the checksum
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("100.0", "1000.0")).unwrap();
    match journal.replay() {
        Err(LoadError::Journal { line, reason }) => {
            assert_eq!(line, 1);
            assert!(reason.contains("checksum"));
        }
        other => panic!("unexpected {:?}", other.map(|r| r.len())),
    }

    fs::write(&path, "not json\n").unwrap();
    assert!(matches!(journal.replay(), Err(LoadError::Journal { line: 1, .. })));
}

#[test]
fn test_missing_journal_is_empty() {
    let dir = tempdir().unwrap();
    let journal = AppendJournal::new(dir.path().join("none.jsonl"));
    assert!(journal.replay().unwrap().is_empty());
}

#[test]
fn test_sqlite_import_load_and_append() {
    let dir = tempdir().unwrap();
    let sheet_path = dir.path().join("legacy.xlsx");
    let db_path = dir.path().join("superstore.db");
    write_sheet(
        &sheet_path,
        &LEGACY_HEADERS,
        &[
            legacy_row(3.0, "US-2024-3", Cell::Number(30.0)),
            legacy_row(1.0, "US-2024-1", Cell::Number(10.0)),
            legacy_row(2.0, "US-2024-2", Cell::Text("n/a")),
        ],
    );

    let mut db = SqliteSource::create(&db_path).unwrap();
    let summary = db
        .import_spreadsheet(&SpreadsheetSource::new(&sheet_path))
        .unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped, 1);

    let store = RecordStore::open(db).unwrap();
    let ids: Vec<u64> = store.load().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(store.get(1).unwrap().order_date, Some(date(2024, 1, 1)));
    assert_eq!(store.get(3).unwrap().sales, Some(30.0));

    let appended = store.append(valid_input("US-2024-4")).unwrap();
    assert_eq!(appended.id, 4);
    drop(store);

    let reopened = RecordStore::open(SqliteSource::open(&db_path).unwrap()).unwrap();
    assert_eq!(reopened.len(), 3);
    assert_eq!(reopened.get(4), Some(appended));
}

#[test]
fn test_sqlite_missing_table_and_column() {
    let dir = tempdir().unwrap();

    let empty = dir.path().join("empty.db");
    match SqliteSource::open(&empty).unwrap().load() {
        Err(LoadError::MissingColumn(name)) => assert_eq!(name, "orders table"),
        other => panic!("unexpected {:?}", other.map(|r| r.len())),
    }

    let partial = dir.path().join("partial.db");
    Connection::open(&partial)
        .unwrap()
        .execute_batch("CREATE TABLE orders (id INTEGER PRIMARY KEY, order_id VARCHAR);")
        .unwrap();
    match SqliteSource::open(&partial).unwrap().load() {
        Err(LoadError::MissingColumn(name)) => assert_eq!(name, "order_date"),
        other => panic!("unexpected {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_created_sqlite_store_starts_empty() {
    let dir = tempdir().unwrap();
    let store = RecordStore::open(SqliteSource::create(dir.path().join("new.db")).unwrap()).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.next_id(), 1);
}
