use serde::{Deserialize, Serialize};

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
}

/// Committed row count against the load report's expectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowCountCheck {
    pub table: String,
    pub rows_expected: u64,
    pub rows_found: u64,
    pub status: CheckStatus,
}

/// Orphan scan over one declared foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyCheck {
    pub child_table: String,
    pub child_column: String,
    pub parent_table: String,
    pub parent_column: String,
    pub orphan_rows: u64,
    pub status: CheckStatus,
}

/// Non-fatal consistency finding, reported but never failing the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyWarning {
    pub code: String,
    pub table: String,
    pub rows_affected: u64,
    pub message: String,
}

/// Report for a verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub row_counts: Vec<RowCountCheck>,
    pub foreign_keys: Vec<ForeignKeyCheck>,
    pub warnings: Vec<VerifyWarning>,
    pub passed: bool,
    pub duration_ms: u64,
}

impl VerifyReport {
    pub fn new() -> Self {
        Self {
            row_counts: Vec::new(),
            foreign_keys: Vec::new(),
            warnings: Vec::new(),
            passed: true,
            duration_ms: 0,
        }
    }

    pub fn record_row_count(&mut self, check: RowCountCheck) {
        if check.status == CheckStatus::Fail {
            self.passed = false;
        }
        self.row_counts.push(check);
    }

    pub fn record_foreign_key(&mut self, check: ForeignKeyCheck) {
        if check.status == CheckStatus::Fail {
            self.passed = false;
        }
        self.foreign_keys.push(check);
    }

    pub fn record_warning(&mut self, warning: VerifyWarning) {
        self.warnings.push(warning);
    }
}

impl Default for VerifyReport {
    fn default() -> Self {
        Self::new()
    }
}
