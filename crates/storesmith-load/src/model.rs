use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the load engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Path of the SQLite store file, recreated on every run.
    pub store_path: PathBuf,
    /// Directory for the load report and schema artifacts, when set.
    pub report_dir: Option<PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("ecommerce.db"),
            report_dir: None,
        }
    }
}

/// A single row skipped for violating a declared constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadViolation {
    pub code: String,
    pub row_index: u64,
    pub message: String,
}

/// Outcome for one table: attempted vs committed rows plus skipped rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResult {
    pub table: String,
    pub rows_attempted: u64,
    pub rows_committed: u64,
    pub violations: Vec<LoadViolation>,
}

impl LoadResult {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            rows_attempted: 0,
            rows_committed: 0,
            violations: Vec::new(),
        }
    }
}

/// Report for a load run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub store_path: PathBuf,
    pub load_order: Vec<String>,
    pub tables: Vec<LoadResult>,
    pub violations_total: u64,
    pub duration_ms: u64,
}

impl LoadReport {
    pub fn new(store_path: PathBuf, load_order: Vec<String>) -> Self {
        Self {
            store_path,
            load_order,
            tables: Vec::new(),
            violations_total: 0,
            duration_ms: 0,
        }
    }

    pub fn record_table(&mut self, result: LoadResult) {
        self.violations_total += result.violations.len() as u64;
        self.tables.push(result);
    }

    /// Look up the result for one table.
    pub fn table(&self, name: &str) -> Option<&LoadResult> {
        self.tables.iter().find(|result| result.table == name)
    }
}
