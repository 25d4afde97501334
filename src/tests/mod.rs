#![allow(dead_code)]

use chrono::{Days, NaiveDate};

use crate::components::{
    error::{LoadResult, StoreError},
    source::{memory::MemorySource, OrderSource},
    store::{record::OrderRecord, record_store::RecordStore, schema::OrderRecordInput},
};

mod console;
mod filters;
mod sources;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A fully populated record shipped three days after it was ordered.
pub fn full_record(id: u64, order_date: NaiveDate, sales: f64, profit: f64) -> OrderRecord {
    OrderRecord {
        id,
        order_id: Some(format!("CA-2024-{}", 100000 + id)),
        order_date: Some(order_date),
        dispatch_date: order_date.checked_add_days(Days::new(3)),
        delivery_mode: Some("Standard Class".to_string()),
        customer_id: Some(format!("CG-{}", 12520 + id)),
        customer_name: Some("Claire Gute".to_string()),
        segment: Some("Consumer".to_string()),
        city: Some("Henderson".to_string()),
        state_province: Some("Kentucky".to_string()),
        country_region: Some("United States".to_string()),
        region: Some("South".to_string()),
        product_id: Some("FUR-BO-10001798".to_string()),
        category: Some("Furniture".to_string()),
        sub_category: Some("Bookcases".to_string()),
        product_name: Some("Bush Somerset Collection Bookcase".to_string()),
        sales: Some(sales),
        quantity: Some(2),
        discount: Some(0.0),
        profit: Some(profit),
    }
}

pub fn located(record: OrderRecord, country: &str, state: &str, city: &str) -> OrderRecord {
    OrderRecord {
        country_region: Some(country.to_string()),
        state_province: Some(state.to_string()),
        city: Some(city.to_string()),
        ..record
    }
}

pub fn categorized(record: OrderRecord, category: &str, sub_category: &str) -> OrderRecord {
    OrderRecord {
        category: Some(category.to_string()),
        sub_category: Some(sub_category.to_string()),
        ..record
    }
}

/// Six orders over two countries and three categories. Record 6 is undated and has
/// a state with no country.
pub fn sample_records() -> Vec<OrderRecord> {
    vec![
        categorized(
            located(full_record(1, date(2024, 1, 5), 100.0, 20.0), "United States", "Kentucky", "Henderson"),
            "Furniture",
            "Bookcases",
        ),
        categorized(
            located(full_record(2, date(2024, 1, 20), 50.0, 5.0), "United States", "California", "Los Angeles"),
            "Office Supplies",
            "Labels",
        ),
        categorized(
            located(full_record(3, date(2024, 3, 2), 200.0, -10.0), "United States", "California", "San Francisco"),
            "Technology",
            "Phones",
        ),
        categorized(
            located(full_record(4, date(2024, 3, 15), 80.0, 16.0), "Canada", "Ontario", "Toronto"),
            "Technology",
            "Accessories",
        ),
        categorized(
            located(full_record(5, date(2024, 4, 1), 120.0, 30.0), "Canada", "Quebec", "Montreal"),
            "Furniture",
            "Chairs",
        ),
        OrderRecord {
            order_date: None,
            dispatch_date: None,
            country_region: None,
            state_province: Some("Ontario".to_string()),
            city: Some("Ottawa".to_string()),
            sub_category: Some("Tables".to_string()),
            ..full_record(6, date(2024, 1, 1), 10.0, 1.0)
        },
    ]
}

pub fn store_with(records: Vec<OrderRecord>) -> RecordStore {
    RecordStore::open(MemorySource::new(records)).unwrap()
}

/// Form input with every field filled in.
pub fn valid_input(order_id: &str) -> OrderRecordInput {
    OrderRecordInput::new()
        .with("order_id", order_id)
        .with("order_date", "2024-05-02")
        .with("dispatch_date", "2024-05-06")
        .with("delivery_mode", "Second Class")
        .with("customer_id", "DV-13045")
        .with("customer_name", "Darrin Van Huff")
        .with("segment", "Corporate")
        .with("city", "Los Angeles")
        .with("state_province", "California")
        .with("country_region", "United States")
        .with("region", "West")
        .with("product_id", "OFF-LA-10000240")
        .with("category", "Office Supplies")
        .with("sub_category", "Labels")
        .with("product_name", "Self-Adhesive Address Labels")
        .with("sales", "14.62")
        .with("quantity", "2")
        .with("discount", "0")
        .with("profit", "6.8714")
}

/// Loads fixed records and refuses every write.
pub struct FailingSource {
    pub records: Vec<OrderRecord>,
}

impl OrderSource for FailingSource {
    fn load(&mut self) -> LoadResult<Vec<OrderRecord>> {
        Ok(self.records.clone())
    }

    fn persist(&mut self, _record: &OrderRecord) -> Result<(), StoreError> {
        Err(StoreError::Persist("disk full".to_string()))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}
