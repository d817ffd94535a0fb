use crate::model::{CheckStatus, VerifyReport};

/// Render a deterministic markdown report for the run directory.
pub fn render_report(report: &VerifyReport) -> String {
    let mut lines = Vec::new();

    lines.push("# Storesmith Verification Report".to_string());
    lines.push(String::new());
    lines.push(format!(
        "- result: {}",
        if report.passed { "PASS" } else { "FAIL" }
    ));
    lines.push(format!("- duration_ms: {}", report.duration_ms));
    lines.push(String::new());

    lines.push("## Row counts".to_string());
    lines.push("| table | expected | found | status |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for check in &report.row_counts {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            check.table,
            check.rows_expected,
            check.rows_found,
            status_label(check.status)
        ));
    }
    lines.push(String::new());

    lines.push("## Foreign keys".to_string());
    lines.push("| child | parent | orphans | status |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for check in &report.foreign_keys {
        lines.push(format!(
            "| {}.{} | {}.{} | {} | {} |",
            check.child_table,
            check.child_column,
            check.parent_table,
            check.parent_column,
            check.orphan_rows,
            status_label(check.status)
        ));
    }
    lines.push(String::new());

    if !report.warnings.is_empty() {
        lines.push("## Warnings".to_string());
        for warning in &report.warnings {
            lines.push(format!(
                "- {} ({}): {} rows — {}",
                warning.code, warning.table, warning.rows_affected, warning.message
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "pass",
        CheckStatus::Fail => "fail",
    }
}
