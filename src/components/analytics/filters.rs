use std::collections::BTreeSet;

use serde::Serialize;

use super::fields::CategoryField;
use crate::components::{source::sort_descending, store::record::OrderRecord};

/// Current values of the cascading dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub country: Option<String>,
    pub state: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub country_options: Vec<String>,
    pub state_options: Vec<String>,
    pub city_options: Vec<String>,
    pub category_options: Vec<String>,
    pub sub_category_options: Vec<String>,
}

/// Exact-match filters for the data table, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilters {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
}

impl TableFilters {
    fn conditions(&self) -> [(CategoryField, Option<&str>); 5] {
        [
            (CategoryField::CountryRegion, self.country.as_deref()),
            (CategoryField::StateProvince, self.state.as_deref()),
            (CategoryField::City, self.city.as_deref()),
            (CategoryField::Category, self.category.as_deref()),
            (CategoryField::SubCategory, self.sub_category.as_deref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.conditions().iter().all(|(_, v)| v.is_none())
    }

    pub fn matches(&self, record: &OrderRecord) -> bool {
        self.conditions()
            .iter()
            .all(|(field, wanted)| wanted.map_or(true, |w| field.value(record) == Some(w)))
    }
}

/// One page of table rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub rows: Vec<OrderRecord>,
    pub page: usize, // Zero-based
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
}

/// Keeps the records whose `field` equals `wanted`, or all of them when nothing is selected.
fn narrow<'a>(
    set: Vec<&'a OrderRecord>,
    field: CategoryField,
    wanted: Option<&str>,
) -> Vec<&'a OrderRecord> {
    match wanted {
        Some(w) => set.into_iter().filter(|r| field.value(r) == Some(w)).collect(),
        None => set,
    }
}

/// Sorted distinct non-null values of `field`.
fn distinct<'a>(
    records: impl IntoIterator<Item = &'a OrderRecord>,
    field: CategoryField,
) -> Vec<String> {
    records
        .into_iter()
        .filter_map(|r| field.value(r))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Dropdown values for the table page. Country and category lists always cover the
/// whole set. Each lower level only appears once its parent is selected.
pub fn compute_filter_options(records: &[OrderRecord], selected: &FilterSelection) -> FilterOptions {
    let country_options = distinct(records, CategoryField::CountryRegion);
    let category_options = distinct(records, CategoryField::Category);

    // Each selection narrows the working set left by the ones before it
    let by_country: Vec<&OrderRecord> = narrow(
        records.iter().collect(),
        CategoryField::CountryRegion,
        selected.country.as_deref(),
    );
    let by_state = narrow(
        by_country.clone(),
        CategoryField::StateProvince,
        selected.state.as_deref(),
    );
    let by_category = narrow(
        by_state.clone(),
        CategoryField::Category,
        selected.category.as_deref(),
    );

    let state_options = if selected.country.is_some() {
        distinct(by_country, CategoryField::StateProvince)
    } else {
        Vec::new()
    };

    let city_options = if selected.state.is_some() {
        distinct(by_state, CategoryField::City)
    } else {
        Vec::new()
    };

    let sub_category_options = if selected.category.is_some() {
        distinct(by_category, CategoryField::SubCategory)
    } else {
        Vec::new()
    };

    FilterOptions {
        country_options,
        state_options,
        city_options,
        category_options,
        sub_category_options,
    }
}

/// Records passing every provided filter, newest id first.
pub fn compute_table(records: &[OrderRecord], filters: &TableFilters) -> Vec<OrderRecord> {
    let mut rows: Vec<OrderRecord> = records
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect();
    sort_descending(&mut rows);
    rows
}

pub fn paginate(rows: Vec<OrderRecord>, page_size: usize, page: usize) -> Page {
    let page_size = page_size.max(1);
    let total_rows = rows.len();
    let total_pages = total_rows.div_ceil(page_size);
    let rows = rows
        .into_iter()
        .skip(page.saturating_mul(page_size))
        .take(page_size)
        .collect();

    Page {
        rows,
        page,
        page_size,
        total_rows,
        total_pages,
    }
}
