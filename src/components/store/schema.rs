use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use super::{
    record::{parse_date, FieldType, COLUMNS},
    value_type::ValueType,
};
use crate::components::error::ValidationError;

const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

lazy_static! {
    /// Append-time schema for the `orders` table. Every column except `id` is required.
    pub static ref ORDER_SCHEMA: TableSchema = TableSchema::orders();
    static ref DATE_RE: Regex = Regex::new(DATE_PATTERN).expect("date pattern compiles");
}

#[derive(Debug, Clone)]
pub struct FieldConstraint {
    pub field_type: FieldType,
    pub required: bool,
    pub pattern: Option<&'static Regex>,
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub fields: Vec<(String, FieldConstraint)>, // Column order
}

impl FieldConstraint {
    /// Coerces a raw form value into the column's type.
    pub fn validate(&self, field: &str, raw: &str) -> Result<ValueType, ValidationError> {
        let raw = raw.trim();
        let invalid = |expected: &'static str| ValidationError::InvalidType {
            field: field.to_string(),
            expected,
            value: raw.to_string(),
        };

        if let Some(pattern) = self.pattern {
            if !pattern.is_match(raw) {
                return Err(ValidationError::PatternMismatch {
                    field: field.to_string(),
                    pattern: pattern.as_str().to_string(),
                });
            }
        }

        match self.field_type {
            FieldType::String => Ok(ValueType::Str(raw.to_string())),
            FieldType::Integer => raw
                .parse::<i64>()
                .map(ValueType::Int)
                .map_err(|_| invalid("an integer")),
            FieldType::Float => match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(ValueType::Float(f)),
                _ => Err(invalid("a number")),
            },
            FieldType::Date => parse_date(raw)
                .map(ValueType::Date)
                .ok_or_else(|| invalid("a YYYY-MM-DD date")),
        }
    }
}

impl TableSchema {
    fn orders() -> Self {
        let fields = COLUMNS
            .iter()
            .filter(|c| c.name != "id")
            .map(|c| {
                let pattern = match c.field_type {
                    FieldType::Date => Some(&*DATE_RE),
                    _ => None,
                };
                (
                    c.name.to_string(),
                    FieldConstraint {
                        field_type: c.field_type,
                        required: true,
                        pattern,
                    },
                )
            })
            .collect();

        TableSchema {
            name: "orders".to_string(),
            fields,
        }
    }

    pub fn constraint(&self, field: &str) -> Option<&FieldConstraint> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, c)| c)
    }

    /// Checks the raw values against the schema and returns the coerced ones.
    pub fn validate_record(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, ValueType>, ValidationError> {
        // First check for unknown fields
        for field_name in values.keys() {
            if self.constraint(field_name).is_none() {
                return Err(ValidationError::UnknownField(field_name.clone()));
            }
        }

        let mut coerced = BTreeMap::new();
        for (field_name, constraint) in &self.fields {
            match values.get(field_name).filter(|v| !v.trim().is_empty()) {
                Some(raw) => {
                    coerced.insert(field_name.clone(), constraint.validate(field_name, raw)?);
                }
                None if constraint.required => {
                    return Err(ValidationError::MissingField(field_name.clone()));
                }
                None => {}
            }
        }

        Ok(coerced)
    }
}

/// Raw values for a new order as submitted by a form. `id` is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct OrderRecordInput {
    pub values: BTreeMap<String, String>,
}

impl OrderRecordInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}
