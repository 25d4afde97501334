//! Dashboard configuration, read from a TOML file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::components::{
    analytics::granularity::Granularity,
    error::LoadResult,
    source::{spreadsheet::SpreadsheetSource, sqlite::SqliteSource, OrderSource},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub log_level: String,
    pub source: SourceConfig,
    pub dashboard: DashboardDefaults,
}

/// Where records are loaded from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub path: PathBuf,
    /// Spreadsheet sources only. Without it the spreadsheet is read-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Sqlite,
    Spreadsheet,
}

/// Initial control values of the dashboard pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardDefaults {
    pub page_size: usize,
    pub granularity: String,
    pub x_axis: String,
    pub y_axis: String,
    pub breakdown: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            log_level: "info".to_string(),
            source: SourceConfig::default(),
            dashboard: DashboardDefaults::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            kind: SourceKind::Sqlite,
            path: PathBuf::from("superstore.db"),
            journal: None,
        }
    }
}

impl Default for DashboardDefaults {
    fn default() -> Self {
        DashboardDefaults {
            page_size: 10,
            granularity: "month".to_string(),
            x_axis: "sales".to_string(),
            y_axis: "profit".to_string(),
            breakdown: "category".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn granularity(&self) -> Granularity {
        Granularity::parse(&self.dashboard.granularity)
    }
}

impl SourceConfig {
    /// Opens the configured source. A missing SQLite table is created empty.
    pub fn open(&self) -> LoadResult<Box<dyn OrderSource>> {
        Ok(match self.kind {
            SourceKind::Sqlite => Box::new(SqliteSource::create(&self.path)?),
            SourceKind::Spreadsheet => {
                let mut sheet = SpreadsheetSource::new(&self.path);
                if let Some(journal) = &self.journal {
                    sheet = sheet.with_journal(journal);
                }
                Box::new(sheet)
            }
        })
    }
}
