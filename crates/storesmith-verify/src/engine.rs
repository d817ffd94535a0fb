use std::time::Instant;

use rusqlite::Connection;
use tracing::{info, warn};

use storesmith_core::TableSpec;
use storesmith_load::LoadReport;

use crate::errors::VerifyError;
use crate::model::{
    CheckStatus, ForeignKeyCheck, RowCountCheck, VerifyReport, VerifyWarning,
};

const AMOUNT_TOLERANCE: f64 = 0.01;

/// Read-only integrity checks over a populated store.
#[derive(Debug, Clone, Default)]
pub struct VerificationEngine;

impl VerificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Check row counts and foreign keys, then the amount consistency of
    /// the e-commerce tables when present.
    ///
    /// The connection is never written through; a failed check flips the
    /// report to failed but the store is left as committed.
    pub fn run(
        &self,
        conn: &Connection,
        tables: &[TableSpec],
        load: &LoadReport,
    ) -> Result<VerifyReport, VerifyError> {
        let start = Instant::now();
        let mut report = VerifyReport::new();

        for result in &load.tables {
            let rows_expected = result.rows_attempted - result.violations.len() as u64;
            let rows_found = count_rows(conn, &result.table)?;
            let status = if rows_found == rows_expected {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            };
            if status == CheckStatus::Fail {
                warn!(
                    table = %result.table,
                    rows_expected,
                    rows_found,
                    "row count mismatch"
                );
            }
            report.record_row_count(RowCountCheck {
                table: result.table.clone(),
                rows_expected,
                rows_found,
                status,
            });
        }

        for table in tables {
            for fk in &table.foreign_keys {
                let orphan_rows = count_orphans(
                    conn,
                    &table.name,
                    &fk.column,
                    &fk.parent_table,
                    &fk.parent_column,
                )?;
                let status = if orphan_rows == 0 {
                    CheckStatus::Pass
                } else {
                    CheckStatus::Fail
                };
                if status == CheckStatus::Fail {
                    warn!(
                        child = %table.name,
                        column = %fk.column,
                        parent = %fk.parent_table,
                        orphan_rows,
                        "orphaned foreign key rows"
                    );
                }
                report.record_foreign_key(ForeignKeyCheck {
                    child_table: table.name.clone(),
                    child_column: fk.column.clone(),
                    parent_table: fk.parent_table.clone(),
                    parent_column: fk.parent_column.clone(),
                    orphan_rows,
                    status,
                });
            }
        }

        check_amount_consistency(conn, tables, &mut report)?;

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            row_counts = report.row_counts.len(),
            foreign_keys = report.foreign_keys.len(),
            warnings = report.warnings.len(),
            passed = report.passed,
            duration_ms = report.duration_ms,
            "verification completed"
        );

        Ok(report)
    }
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64, VerifyError> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count as u64)
}

fn count_orphans(
    conn: &Connection,
    child_table: &str,
    child_column: &str,
    parent_table: &str,
    parent_column: &str,
) -> Result<u64, VerifyError> {
    let sql = format!(
        "SELECT COUNT(*) FROM {child} c \
         LEFT JOIN {parent} p ON c.{child_col} = p.{parent_col} \
         WHERE p.{parent_col} IS NULL AND c.{child_col} IS NOT NULL",
        child = quote_ident(child_table),
        parent = quote_ident(parent_table),
        child_col = quote_ident(child_column),
        parent_col = quote_ident(parent_column),
    );
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count as u64)
}

/// Amount checks over the e-commerce tables, reported as warnings.
///
/// These flag drift between accumulated item totals and the stored order
/// and payment amounts; the loader never enforces them.
fn check_amount_consistency(
    conn: &Connection,
    tables: &[TableSpec],
    report: &mut VerifyReport,
) -> Result<(), VerifyError> {
    let has_table = |name: &str, columns: &[&str]| {
        tables
            .iter()
            .find(|table| table.name == name)
            .is_some_and(|table| columns.iter().all(|column| table.column(column).is_some()))
    };

    if has_table("orders", &["order_id", "total_amount"])
        && has_table("order_items", &["order_id", "total"])
    {
        let sql = format!(
            "SELECT COUNT(*) FROM \"orders\" o \
             WHERE ABS(o.\"total_amount\" - ( \
                 SELECT COALESCE(SUM(oi.\"total\"), 0) \
                 FROM \"order_items\" oi WHERE oi.\"order_id\" = o.\"order_id\" \
             )) > {AMOUNT_TOLERANCE}"
        );
        let mismatched: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        if mismatched > 0 {
            report.record_warning(VerifyWarning {
                code: "order_total_mismatch".to_string(),
                table: "orders".to_string(),
                rows_affected: mismatched as u64,
                message: "order total_amount differs from the sum of its items".to_string(),
            });
        }
    }

    if has_table("payments", &["order_id", "payment_amount"])
        && has_table("orders", &["order_id", "total_amount"])
    {
        let sql = format!(
            "SELECT COUNT(*) FROM \"payments\" p \
             JOIN \"orders\" o ON p.\"order_id\" = o.\"order_id\" \
             WHERE ABS(p.\"payment_amount\" - o.\"total_amount\") > {AMOUNT_TOLERANCE}"
        );
        let mismatched: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        if mismatched > 0 {
            report.record_warning(VerifyWarning {
                code: "payment_amount_mismatch".to_string(),
                table: "payments".to_string(),
                rows_affected: mismatched as u64,
                message: "payment_amount differs from the order's total_amount".to_string(),
            });
        }
    }

    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
