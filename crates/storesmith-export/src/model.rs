use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the export engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Path of the flattened CSV output.
    pub out_path: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from("output.csv"),
        }
    }
}

/// Aggregates computed alongside the export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub table_counts: BTreeMap<String, u64>,
    /// Sum of completed payments.
    pub total_revenue: f64,
    /// Category with the highest item revenue, when items exist.
    pub top_category: Option<String>,
}

/// Report for an export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub out_path: PathBuf,
    pub rows_exported: u64,
    pub bytes_written: u64,
    pub columns: Vec<String>,
    pub summary: SummaryStats,
    pub duration_ms: u64,
}
