#![allow(unused_imports)]
use crate::{
    components::analytics::{compute_filter_options, FilterSelection},
    tests::sample_records,
};

fn selection(country: Option<&str>, state: Option<&str>, category: Option<&str>) -> FilterSelection {
    FilterSelection {
        country: country.map(str::to_string),
        state: state.map(str::to_string),
        category: category.map(str::to_string),
    }
}

#[test]
fn test_no_selection() {
    let options = compute_filter_options(&sample_records(), &FilterSelection::default());

    // Record 6 has no country, so it contributes nothing
    assert_eq!(options.country_options, vec!["Canada", "United States"]);
    assert_eq!(
        options.category_options,
        vec!["Furniture", "Office Supplies", "Technology"]
    );
    assert!(options.state_options.is_empty());
    assert!(options.city_options.is_empty());
    assert!(options.sub_category_options.is_empty());
}

#[test]
fn test_country_narrows_states() {
    let options = compute_filter_options(
        &sample_records(),
        &selection(Some("United States"), None, None),
    );

    assert_eq!(options.state_options, vec!["California", "Kentucky"]);
    assert!(options.city_options.is_empty());
    // Top-level lists ignore the selection
    assert_eq!(options.country_options, vec!["Canada", "United States"]);
}

#[test]
fn test_country_and_state_narrow_cities() {
    let options = compute_filter_options(
        &sample_records(),
        &selection(Some("United States"), Some("California"), None),
    );
    assert_eq!(options.city_options, vec!["Los Angeles", "San Francisco"]);

    // Ottawa has no country and drops out once one is chosen
    let options = compute_filter_options(
        &sample_records(),
        &selection(Some("Canada"), Some("Ontario"), None),
    );
    assert_eq!(options.city_options, vec!["Toronto"]);
}

#[test]
fn test_state_without_country() {
    let options = compute_filter_options(&sample_records(), &selection(None, Some("Ontario"), None));

    assert!(options.state_options.is_empty());
    assert_eq!(options.city_options, vec!["Ottawa", "Toronto"]);
}

#[test]
fn test_category_narrows_sub_categories() {
    let options = compute_filter_options(&sample_records(), &selection(None, None, Some("Furniture")));
    assert_eq!(
        options.sub_category_options,
        vec!["Bookcases", "Chairs", "Tables"]
    );

    let options = compute_filter_options(&sample_records(), &selection(None, None, Some("Toys")));
    assert!(options.sub_category_options.is_empty());
}

#[test]
fn test_empty_records() {
    let options = compute_filter_options(&[], &selection(Some("Canada"), Some("Ontario"), Some("Furniture")));
    assert!(options.country_options.is_empty());
    assert!(options.state_options.is_empty());
    assert!(options.city_options.is_empty());
    assert!(options.category_options.is_empty());
    assert!(options.sub_category_options.is_empty());
}

#[test]
fn test_location_narrows_sub_categories() {
    // Bookcases is a US order and Tables has no country
    let options = compute_filter_options(
        &sample_records(),
        &selection(Some("Canada"), None, Some("Furniture")),
    );
    assert_eq!(options.sub_category_options, vec!["Chairs"]);

    let options = compute_filter_options(
        &sample_records(),
        &selection(Some("United States"), Some("California"), Some("Technology")),
    );
    assert_eq!(options.sub_category_options, vec!["Phones"]);

    // A state alone narrows too
    let options = compute_filter_options(&sample_records(), &selection(None, Some("Ontario"), Some("Furniture")));
    assert_eq!(options.sub_category_options, vec!["Tables"]);

    let options = compute_filter_options(
        &sample_records(),
        &selection(Some("Canada"), None, Some("Office Supplies")),
    );
    assert!(options.sub_category_options.is_empty());
}
