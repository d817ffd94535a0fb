use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where the CSV tables are written.
    pub data_dir: PathBuf,
    /// Run seed; the per-table seed is derived from it.
    pub seed: u64,
    /// Pinned row count for customers; sampled from 100..=300 when unset.
    pub customers: Option<u64>,
    /// Pinned row count for products; sampled from 100..=300 when unset.
    pub products: Option<u64>,
    /// Pinned row count for orders; sampled from 100..=300 when unset.
    pub orders: Option<u64>,
    /// Pinned row count for order items; sampled from 150..=300 when unset.
    pub order_items: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed: 42,
            customers: None,
            products: None,
            orders: None,
            order_items: None,
        }
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows_requested: u64,
    pub rows_written: u64,
    pub bytes_written: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub rows_total: u64,
    pub bytes_total: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tables: Vec::new(),
            rows_total: 0,
            bytes_total: 0,
            duration_ms: 0,
        }
    }

    pub fn record_table(&mut self, report: TableReport) {
        self.rows_total += report.rows_written;
        self.bytes_total += report.bytes_written;
        self.tables.push(report);
    }

    /// Look up the report for one table.
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|table| table.table == name)
    }
}
