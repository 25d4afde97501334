use serde::Serialize;

use super::{
    fields::{CategoryField, NumericField},
    window::DateWindow,
};
use crate::components::store::record::OrderRecord;

/// Controls of the bubble chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRequest {
    pub x_field: String,
    pub y_field: String,
    pub size_field: Option<String>,
    pub group_field: String,
    pub window: DateWindow,
}

/// One bubble: a single record, never pre-aggregated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub size: Option<f64>,
    pub group: Option<String>,
}

pub fn compute_breakdown(records: &[OrderRecord], request: &BreakdownRequest) -> Vec<BreakdownPoint> {
    let (Some(x_field), Some(y_field)) = (
        NumericField::parse(&request.x_field),
        NumericField::parse(&request.y_field),
    ) else {
        return Vec::new();
    };

    let size_field = request
        .size_field
        .as_deref()
        .and_then(NumericField::parse)
        .unwrap_or(NumericField::Quantity);
    let group_field = CategoryField::parse(&request.group_field);

    request
        .window
        .filter(records)
        .into_iter()
        .filter_map(|record| {
            Some(BreakdownPoint {
                id: record.id,
                x: x_field.value(record)?,
                y: y_field.value(record)?,
                size: size_field.value(record),
                group: group_field
                    .and_then(|field| field.value(record))
                    .map(str::to_string),
            })
        })
        .collect()
}
