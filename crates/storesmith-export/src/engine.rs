use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use rusqlite::Connection;
use rusqlite::types::ValueRef;
use tracing::info;

use crate::errors::ExportError;
use crate::model::{ExportOptions, ExportReport, SummaryStats};
use crate::query::{TOP_CATEGORY_QUERY, TOTAL_REVENUE_QUERY, TRANSACTION_DETAIL_QUERY};

/// Runs the flattening join and writes the CSV export.
#[derive(Debug, Clone)]
pub struct ExportEngine {
    options: ExportOptions,
}

impl ExportEngine {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Execute the transaction-detail query and serialize every row.
    ///
    /// The connection is expected to be a read-only handle to a store the
    /// caller has accepted.
    pub fn run(&self, conn: &Connection) -> Result<ExportReport, ExportError> {
        let start = Instant::now();

        if let Some(parent) = self.options.out_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut stmt = conn.prepare(TRANSACTION_DETAIL_QUERY)?;
        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let writer = BufWriter::new(File::create(&self.options.out_path)?);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(&columns)?;

        let mut rows_exported = 0_u64;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let record: Vec<String> = (0..columns.len())
                .map(|idx| row.get_ref(idx).map(format_value))
                .collect::<Result<_, _>>()?;
            writer.write_record(&record)?;
            rows_exported += 1;
        }
        writer.flush()?;

        let bytes_written = std::fs::metadata(&self.options.out_path)?.len();
        let summary = collect_summary(conn)?;

        let report = ExportReport {
            out_path: self.options.out_path.clone(),
            rows_exported,
            bytes_written,
            columns,
            summary,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            rows_exported = report.rows_exported,
            bytes_written = report.bytes_written,
            out = %report.out_path.display(),
            duration_ms = report.duration_ms,
            "export completed"
        );

        Ok(report)
    }
}

fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn collect_summary(conn: &Connection) -> Result<SummaryStats, ExportError> {
    let mut table_counts = BTreeMap::new();
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    for name in names {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", name.replace('"', "\"\""));
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        table_counts.insert(name, count as u64);
    }

    let total_revenue = if table_counts.contains_key("payments") {
        conn.query_row(TOTAL_REVENUE_QUERY, [], |row| row.get(0))?
    } else {
        0.0
    };

    let top_category = if table_counts.contains_key("order_items")
        && table_counts.contains_key("products")
    {
        conn.query_row(TOP_CATEGORY_QUERY, [], |row| row.get(0))
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?
    } else {
        None
    };

    Ok(SummaryStats {
        table_counts,
        total_revenue,
        top_category,
    })
}
