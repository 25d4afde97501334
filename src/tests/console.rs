#![allow(unused_imports)]
use crate::{
    components::{
        config::DashboardDefaults,
        repl::{OutputFormat, REPL},
    },
    tests::{sample_records, store_with},
};

const ADD_COMMAND: &str = r#"ADD order_id=US-2024-300001 order_date=2024-06-03 dispatch_date=2024-06-07 delivery_mode="Standard Class" customer_id=BH-11710 customer_name="Brosina Hoffman" segment=Consumer city="Los Angeles" state_province=California country_region="United States" region=West product_id=FUR-FU-10001487 category=Furniture sub_category=Furnishings product_name="Eldon Expressions Desk Accessory" sales=48.86 quantity=7 discount=0 profit=14.1694"#;

#[test]
fn test_console_comprehensive() {
    let store = store_with(sample_records());
    let repl = REPL::new(&store, DashboardDefaults::default());

    // Test 1: Overview
    let result = repl.execute("OVERVIEW", None).unwrap();
    assert!(result.contains("Total orders: 6"));
    assert!(result.contains("Total sales: 560.00"));
    assert!(result.contains("Order dates: 2024-01-05 to 2024-04-01"));

    // Test 2: Cascading options with a quoted value
    let result = repl
        .execute(r#"OPTIONS country="United States" state=California"#, None)
        .unwrap();
    assert!(result.contains("States: California, Kentucky"));
    assert!(result.contains("Cities: Los Angeles, San Francisco"));
    assert!(result.contains("Sub-categories: (none)"));

    // Test 3: Filtered table
    let result = repl.execute("TABLE category=Technology", None).unwrap();
    assert!(result.starts_with("Page 1 of 1 (2 matching records)"));
    assert!(result.contains("Record 4:"));
    assert!(result.contains("Record 3:"));
    assert!(!result.contains("Record 1:"));

    // Test 4: Pages start at 1
    let result = repl.execute("TABLE page=2 page_size=4", None).unwrap();
    assert!(result.starts_with("Page 2 of 2 (6 matching records)"));
    assert!(result.contains("Record 2:"));
    assert!(repl.execute("TABLE page=0", None).is_err());

    // Test 5: Next id, add, chained with AND
    let result = repl
        .execute(&format!("NEXT_ID AND {} AND NEXT_ID", ADD_COMMAND), None)
        .unwrap();
    assert!(result.contains("Next record id: 7"));
    assert!(result.contains("Added record 7 (order US-2024-300001)"));
    assert!(result.contains("Next record id: 8"));
    assert_eq!(store.len(), 7);

    // Test 6: Duplicate order id is reported and nothing is added
    let result = repl.execute(ADD_COMMAND, None);
    assert!(result.unwrap_err().contains("US-2024-300001"));
    assert_eq!(store.len(), 7);

    // Test 7: Timeline picks up the new record
    let result = repl
        .execute("TIMELINE start=2024-06-01 end=2024-06-30 granularity=D", None)
        .unwrap();
    assert!(result.starts_with("1 day buckets"));
    assert!(result.contains("2024-06-03..2024-06-03: orders=1, sales=48.86"));
    assert!(result.contains("days_to_ship=4"));

    // Test 8: Breakdown uses the configured axes
    let result = repl.execute("BREAKDOWN start=2024-03-01 end=2024-03-31", None).unwrap();
    assert!(result.starts_with("2 points (x: sales, y: profit, group: category)"));
    assert!(result.contains("Record 3: x=200.00, y=-10.00, size=2.00, group=Technology"));

    // Test 9: Axis options
    let result = repl.execute("AXES exclude=sales", None).unwrap();
    assert!(result.contains("Axes: days_to_ship, discount, profit, profit_ratio, quantity"));
    assert!(result.contains("Breakdowns: segment, delivery_mode"));
}

#[test]
fn test_console_defaults_fill_window() {
    let store = store_with(sample_records());
    let repl = REPL::new(&store, DashboardDefaults::default());

    let result = repl.execute("TIMELINE", None).unwrap();
    assert!(result.starts_with("4 month buckets"));
    assert!(result.contains("2024-02-01..2024-02-29: orders=0"));

    let result = repl.execute("TIMELINE end=2024-01-31 granularity=weekly", None).unwrap();
    assert!(result.starts_with("3 week buckets"));
}

#[test]
fn test_console_empty_store() {
    let store = store_with(Vec::new());
    let repl = REPL::new(&store, DashboardDefaults::default());

    let result = repl.execute("OVERVIEW", None).unwrap();
    assert!(result.contains("Total orders: 0"));
    assert!(result.contains("Profit ratio: 0.00%"));
    assert!(result.contains("Order dates: NULL to NULL"));

    assert!(repl.execute("TIMELINE", None).unwrap().starts_with("0 month buckets"));
    assert!(repl.execute("BREAKDOWN", None).unwrap().starts_with("0 points"));
    assert!(repl.execute("NEXT_ID", None).unwrap().contains("Next record id: 1"));
}

#[test]
fn test_console_errors() {
    let store = store_with(sample_records());
    let repl = REPL::new(&store, DashboardDefaults::default());

    assert!(repl.execute("DROP_TABLE orders", None).is_err());
    assert!(repl.execute("TABLE colour=red", None).is_err());
    assert!(repl.execute("TIMELINE start=yesterday", None).is_err());
    assert!(repl.execute("TABLE page_size=ten", None).is_err());
    assert!(repl.execute("ADD", None).is_err());
    assert!(repl.execute("ADD order_id=X", None).unwrap_err().contains("missing"));
    assert!(repl.execute("HELP NOT_A_COMMAND", None).is_err());

    // One failing command fails the whole chain
    assert!(repl.execute("OVERVIEW AND ADD order_id=X", None).is_err());
    assert_eq!(store.len(), 6);
}

#[test]
fn test_console_json_output() {
    let store = store_with(sample_records());
    let repl = REPL::new(&store, DashboardDefaults::default());

    let result = repl
        .execute("OVERVIEW AND NEXT_ID", Some(OutputFormat::JSON))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&result).unwrap();
    assert_eq!(value["count"], 2);
    assert_eq!(value["success"], true);
    assert_eq!(value["results"][0]["executed_command"], "Overview");
    assert_eq!(value["results"][0]["data"]["total_orders"], 6);
    assert_eq!(value["results"][0]["data"]["start_date"], "2024-01-05");
    assert_eq!(value["results"][1]["data"]["next_id"], 7);

    let result = repl
        .execute("TABLE country=Canada", Some(OutputFormat::JSON))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&result).unwrap();
    let page = &value["results"][0]["data"];
    assert_eq!(page["total_rows"], 2);
    assert_eq!(page["rows"][0]["id"], 5);
    assert_eq!(page["rows"][1]["city"], "Toronto");

    // Errors become payloads
    let result = repl.execute("BOGUS", Some(OutputFormat::JSON)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&result).unwrap();
    assert_eq!(value["success"], false);
    assert!(value["error"].as_str().unwrap().contains("BOGUS"));
}

#[test]
fn test_console_table_output() {
    let store = store_with(sample_records());
    let repl = REPL::new(&store, DashboardDefaults::default());

    let result = repl
        .execute("TABLE country=Canada", Some(OutputFormat::Table))
        .unwrap();
    assert!(result.contains("| id "));
    assert!(result.contains("Montreal"));
    assert!(result.contains("Page 1 of 1 (2 matching records)"));

    let result = repl.execute("OVERVIEW", Some(OutputFormat::Table)).unwrap();
    assert!(result.contains("| Total orders "));

    let result = repl.execute("NEXT_ID", Some(OutputFormat::Table)).unwrap();
    assert!(result.contains("SUCCESS"));
    assert!(result.contains("Next record id: 7"));

    let result = repl.execute("TABLE colour=red", Some(OutputFormat::Table)).unwrap();
    assert!(result.contains("ERROR"));
}

#[test]
fn test_console_help() {
    let store = store_with(Vec::new());
    let repl = REPL::new(&store, DashboardDefaults::default());

    let result = repl.execute("HELP", None).unwrap();
    assert!(result.contains("Available commands:"));
    assert!(result.contains("BREAKDOWN"));

    let result = repl.execute("HELP timeline", None).unwrap();
    assert!(result.contains("Syntax: TIMELINE"));
    assert!(result.contains("granularity=<unit>"));

    let result = repl.execute("HELP", Some(OutputFormat::JSON)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&result).unwrap();
    let commands: Vec<String> =
        serde_json::from_str(value["results"][0]["message"].as_str().unwrap()).unwrap();
    assert_eq!(commands.len(), 9);
    assert!(commands.contains(&"NEXT_ID".to_string()));
}

#[test]
fn test_console_failed_chain_keeps_earlier_results() {
    let store = store_with(sample_records());
    let repl = REPL::new(&store, DashboardDefaults::default());

    let result = repl
        .execute("NEXT_ID AND ADD order_id=X AND OVERVIEW", Some(OutputFormat::JSON))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&result).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["count"], 2);
    assert_eq!(value["results"][0]["success"], true);
    assert_eq!(value["results"][1]["executed_command"], "Add");
    assert_eq!(value["results"][1]["success"], false);
    assert!(value["error"].as_str().unwrap().contains("missing"));
    assert_eq!(store.len(), 6);

    let result = repl
        .execute("OVERVIEW AND ADD order_id=X", Some(OutputFormat::Table))
        .unwrap();
    assert!(result.contains("| Total orders "));
    assert!(result.contains("ERROR"));
    assert!(!result.contains("SUCCESS"));
}
