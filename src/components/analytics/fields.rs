use serde::Serialize;

use crate::components::store::record::OrderRecord;

/// Numeric columns the charts can plot, derived ones included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    DaysToShip,
    Discount,
    Profit,
    ProfitRatio,
    Quantity,
    Sales,
}

impl NumericField {
    pub const ALL: [NumericField; 6] = [
        NumericField::DaysToShip,
        NumericField::Discount,
        NumericField::Profit,
        NumericField::ProfitRatio,
        NumericField::Quantity,
        NumericField::Sales,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name.trim())
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericField::DaysToShip => "days_to_ship",
            NumericField::Discount => "discount",
            NumericField::Profit => "profit",
            NumericField::ProfitRatio => "profit_ratio",
            NumericField::Quantity => "quantity",
            NumericField::Sales => "sales",
        }
    }

    pub fn label(self) -> String {
        title_case(self.name())
    }

    pub fn value(self, record: &OrderRecord) -> Option<f64> {
        match self {
            NumericField::DaysToShip => record.days_to_ship().map(|d| d as f64),
            NumericField::Discount => record.discount,
            NumericField::Profit => record.profit,
            NumericField::ProfitRatio => record.profit_ratio(),
            NumericField::Quantity => record.quantity.map(|q| q as f64),
            NumericField::Sales => record.sales,
        }
    }
}

/// String columns usable as filters or chart groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    OrderId,
    DeliveryMode,
    CustomerId,
    CustomerName,
    Segment,
    City,
    StateProvince,
    CountryRegion,
    Region,
    ProductId,
    Category,
    SubCategory,
    ProductName,
}

impl CategoryField {
    pub const ALL: [CategoryField; 13] = [
        CategoryField::OrderId,
        CategoryField::DeliveryMode,
        CategoryField::CustomerId,
        CategoryField::CustomerName,
        CategoryField::Segment,
        CategoryField::City,
        CategoryField::StateProvince,
        CategoryField::CountryRegion,
        CategoryField::Region,
        CategoryField::ProductId,
        CategoryField::Category,
        CategoryField::SubCategory,
        CategoryField::ProductName,
    ];

    /// Groupings offered by the bubble chart's breakdown control.
    pub const BREAKDOWNS: [CategoryField; 6] = [
        CategoryField::Segment,
        CategoryField::DeliveryMode,
        CategoryField::CustomerName,
        CategoryField::Category,
        CategoryField::SubCategory,
        CategoryField::ProductName,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name.trim())
    }

    pub fn name(self) -> &'static str {
        match self {
            CategoryField::OrderId => "order_id",
            CategoryField::DeliveryMode => "delivery_mode",
            CategoryField::CustomerId => "customer_id",
            CategoryField::CustomerName => "customer_name",
            CategoryField::Segment => "segment",
            CategoryField::City => "city",
            CategoryField::StateProvince => "state_province",
            CategoryField::CountryRegion => "country_region",
            CategoryField::Region => "region",
            CategoryField::ProductId => "product_id",
            CategoryField::Category => "category",
            CategoryField::SubCategory => "sub_category",
            CategoryField::ProductName => "product_name",
        }
    }

    pub fn label(self) -> String {
        match self {
            CategoryField::DeliveryMode => "Ship Mode".to_string(),
            CategoryField::SubCategory => "Sub-Category".to_string(),
            other => title_case(other.name()),
        }
    }

    pub fn value(self, record: &OrderRecord) -> Option<&str> {
        let value = match self {
            CategoryField::OrderId => &record.order_id,
            CategoryField::DeliveryMode => &record.delivery_mode,
            CategoryField::CustomerId => &record.customer_id,
            CategoryField::CustomerName => &record.customer_name,
            CategoryField::Segment => &record.segment,
            CategoryField::City => &record.city,
            CategoryField::StateProvince => &record.state_province,
            CategoryField::CountryRegion => &record.country_region,
            CategoryField::Region => &record.region,
            CategoryField::ProductId => &record.product_id,
            CategoryField::Category => &record.category,
            CategoryField::SubCategory => &record.sub_category,
            CategoryField::ProductName => &record.product_name,
        };
        value.as_deref()
    }
}

/// A dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Numeric fields for one chart axis, minus the field chosen on the other axis.
pub fn axis_options(exclude: Option<&str>) -> Vec<FieldOption> {
    NumericField::ALL
        .into_iter()
        .filter(|f| Some(f.name()) != exclude)
        .map(|f| FieldOption {
            value: f.name().to_string(),
            label: f.label(),
        })
        .collect()
}

pub fn breakdown_options() -> Vec<FieldOption> {
    CategoryField::BREAKDOWNS
        .into_iter()
        .map(|f| FieldOption {
            value: f.name().to_string(),
            label: f.label(),
        })
        .collect()
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
