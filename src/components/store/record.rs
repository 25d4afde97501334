use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value_type::ValueType;

/// Storage type of a column in the order schema.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Date,
}

/// A column of the order table: its field name and the header used by the spreadsheet export.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub header: &'static str,
    pub field_type: FieldType,
}

const fn column(name: &'static str, header: &'static str, field_type: FieldType) -> Column {
    Column {
        name,
        header,
        field_type,
    }
}

/// Every stored column in table order. `id` is first.
pub const COLUMNS: [Column; 20] = [
    column("id", "Row ID", FieldType::Integer),
    column("order_id", "Order ID", FieldType::String),
    column("order_date", "Order Date", FieldType::Date),
    column("dispatch_date", "Dispatch Date", FieldType::Date),
    column("delivery_mode", "Delivery Mode", FieldType::String),
    column("customer_id", "Customer ID", FieldType::String),
    column("customer_name", "Customer Name", FieldType::String),
    column("segment", "Segment", FieldType::String),
    column("city", "City", FieldType::String),
    column("state_province", "State/Province", FieldType::String),
    column("country_region", "Country/Region", FieldType::String),
    column("region", "Region", FieldType::String),
    column("product_id", "Product ID", FieldType::String),
    column("category", "Category", FieldType::String),
    column("sub_category", "Sub-Category", FieldType::String),
    column("product_name", "Product Name", FieldType::String),
    column("sales", "Sales", FieldType::Float),
    column("quantity", "Quantity", FieldType::Integer),
    column("discount", "Discount", FieldType::Float),
    column("profit", "Profit", FieldType::Float),
];

/// One product line of a customer order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: u64,
    pub order_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub dispatch_date: Option<NaiveDate>,
    pub delivery_mode: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub segment: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country_region: Option<String>,
    pub region: Option<String>,
    pub product_id: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub product_name: Option<String>,
    pub sales: Option<f64>,
    pub quantity: Option<i64>,
    pub discount: Option<f64>,
    pub profit: Option<f64>,
}

impl OrderRecord {
    pub fn new(id: u64) -> Self {
        OrderRecord {
            id,
            ..Default::default()
        }
    }

    /// Whole days between order and dispatch. Negative when the source data is out of order.
    pub fn days_to_ship(&self) -> Option<i64> {
        match (self.order_date, self.dispatch_date) {
            (Some(ordered), Some(dispatched)) => Some((dispatched - ordered).num_days()),
            _ => None,
        }
    }

    /// Per-record `profit / sales`, undefined for zero sales.
    pub fn profit_ratio(&self) -> Option<f64> {
        match (self.profit, self.sales) {
            (Some(profit), Some(sales)) if sales != 0.0 => Some(profit / sales),
            _ => None,
        }
    }

    /// Builds a record from already-coerced column values. Unknown names are ignored.
    pub fn from_values(id: u64, values: &BTreeMap<String, ValueType>) -> Self {
        let mut record = OrderRecord::new(id);
        for (name, value) in values {
            record.set_field(name, value.clone());
        }
        record
    }

    /// Sets a stored column. Values of the wrong shape leave the field untouched.
    pub fn set_field(&mut self, field: &str, value: ValueType) {
        let text = || value.as_str().map(str::to_string);
        match field {
            "order_id" => self.order_id = text(),
            "order_date" => self.order_date = value.as_date(),
            "dispatch_date" => self.dispatch_date = value.as_date(),
            "delivery_mode" => self.delivery_mode = text(),
            "customer_id" => self.customer_id = text(),
            "customer_name" => self.customer_name = text(),
            "segment" => self.segment = text(),
            "city" => self.city = text(),
            "state_province" => self.state_province = text(),
            "country_region" => self.country_region = text(),
            "region" => self.region = text(),
            "product_id" => self.product_id = text(),
            "category" => self.category = text(),
            "sub_category" => self.sub_category = text(),
            "product_name" => self.product_name = text(),
            "sales" => self.sales = value.as_f64(),
            "quantity" => self.quantity = value.as_i64(),
            "discount" => self.discount = value.as_f64(),
            "profit" => self.profit = value.as_f64(),
            _ => {}
        }
    }

    /// Reads a stored or derived field by name.
    pub fn get_field(&self, field: &str) -> Option<ValueType> {
        let text = |v: &Option<String>| v.clone().map(ValueType::Str);
        match field {
            "id" => Some(ValueType::Int(self.id as i64)),
            "order_id" => text(&self.order_id),
            "order_date" => self.order_date.map(ValueType::Date),
            "dispatch_date" => self.dispatch_date.map(ValueType::Date),
            "delivery_mode" => text(&self.delivery_mode),
            "customer_id" => text(&self.customer_id),
            "customer_name" => text(&self.customer_name),
            "segment" => text(&self.segment),
            "city" => text(&self.city),
            "state_province" => text(&self.state_province),
            "country_region" => text(&self.country_region),
            "region" => text(&self.region),
            "product_id" => text(&self.product_id),
            "category" => text(&self.category),
            "sub_category" => text(&self.sub_category),
            "product_name" => text(&self.product_name),
            "sales" => self.sales.map(ValueType::Float),
            "quantity" => self.quantity.map(ValueType::Int),
            "discount" => self.discount.map(ValueType::Float),
            "profit" => self.profit.map(ValueType::Float),
            "days_to_ship" => self.days_to_ship().map(ValueType::Int),
            "profit_ratio" => self.profit_ratio().map(ValueType::Float),
            _ => None,
        }
    }
}

/// Parses the date shapes found in exports and form input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}
