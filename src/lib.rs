//! Analytics and record keeping behind the superstore sales dashboard.
//!
//! Records are loaded once from a spreadsheet or SQLite source into a
//! [`RecordStore`]. The views in [`components::analytics`] are pure functions over a
//! snapshot of that store, and [`REPL`] exposes them as console commands.

pub mod components;

#[cfg(test)]
mod tests;

pub use components::{
    config::DashboardConfig,
    error::{ExportError, LoadError, StoreError, ValidationError},
    repl::{OutputFormat, REPL},
    source::OrderSource,
    store::{record::OrderRecord, record_store::RecordStore, schema::OrderRecordInput},
};
