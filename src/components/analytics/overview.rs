use chrono::NaiveDate;
use serde::Serialize;

use crate::components::store::record::OrderRecord;

/// Landing page KPIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_orders: usize,
    pub total_sales: f64,
    pub total_profit: f64,
    pub profit_ratio: f64, // Percent
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub fn compute_overview(records: &[OrderRecord]) -> Overview {
    let total_sales: f64 = records.iter().filter_map(|r| r.sales).sum();
    let total_profit: f64 = records.iter().filter_map(|r| r.profit).sum();

    let profit_ratio = if total_sales != 0.0 {
        total_profit / total_sales * 100.0
    } else {
        0.0
    };

    let dates = records.iter().filter_map(|r| r.order_date);
    let start_date = dates.clone().min();
    let end_date = dates.max();

    Overview {
        total_orders: records.len(),
        total_sales,
        total_profit,
        profit_ratio,
        start_date,
        end_date,
    }
}
