use std::collections::BTreeMap;
use std::time::Instant;

use rusqlite::{Connection, Transaction, TransactionBehavior, ffi};
use tracing::{info, warn};

use storesmith_core::{
    TableKeys, TableSpec, assemble_table, build_dependency_report, validate_catalog,
};
use storesmith_infer::infer_columns;

use crate::ddl::{build_ddl, quote_ident};
use crate::errors::{LoadError, config_error};
use crate::model::{LoadOptions, LoadReport, LoadResult, LoadViolation};
use crate::source::TableSource;

/// Result of a load run.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub report: LoadReport,
    pub tables: Vec<TableSpec>,
}

/// Entry point for loading table sources into the embedded store.
#[derive(Debug, Clone)]
pub struct LoadEngine {
    options: LoadOptions,
}

impl LoadEngine {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Infer, create, and populate the store from the given sources.
    ///
    /// All DDL and inserts run inside one exclusive transaction. Rows that
    /// fail a constraint are skipped and recorded; a commit failure rolls
    /// the whole run back and removes the store file.
    pub fn run(
        &self,
        sources: &[TableSource],
        keys: &[TableKeys],
    ) -> Result<LoadOutcome, LoadError> {
        let start = Instant::now();
        info!(
            tables = sources.len(),
            store = %self.options.store_path.display(),
            "load started"
        );

        let mut specs: Vec<TableSpec> = Vec::with_capacity(sources.len());
        for source in sources {
            if source.header.is_empty() {
                warn!(table = %source.table, "skipping table with no columns");
                continue;
            }
            let columns = infer_columns(&source.header, &source.rows);
            let table_keys = keys
                .iter()
                .find(|entry| entry.table == source.table)
                .cloned()
                .unwrap_or_else(|| TableKeys::empty(&source.table));
            specs.push(assemble_table(&source.table, columns, &table_keys));
        }

        validate_catalog(&specs)?;

        let dependency = build_dependency_report(&specs);
        let load_order = match dependency.load_order {
            Some(order) => order,
            None => {
                let members = dependency.cycle.unwrap_or_default().join(", ");
                return Err(config_error(format!("cyclic dependency graph: {members}")));
            }
        };

        if self.options.store_path.exists() {
            std::fs::remove_file(&self.options.store_path)?;
        }
        if let Some(parent) = self.options.store_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = Connection::open(&self.options.store_path)?;
        // Must run outside any transaction; the pragma is a no-op once a
        // scope is open.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let statements = build_ddl(&specs, &load_order);
        let sources_by_name: BTreeMap<&str, &TableSource> = sources
            .iter()
            .map(|source| (source.table.as_str(), source))
            .collect();

        let tx = conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;
        tx.execute_batch(&statements.join("\n"))?;

        let mut results: Vec<LoadResult> = Vec::new();
        for table_name in &load_order {
            let Some(source) = sources_by_name.get(table_name.as_str()) else {
                continue;
            };
            let table_start = Instant::now();
            let result = insert_rows(&tx, source)?;
            info!(
                table = %table_name,
                rows_committed = result.rows_committed,
                violations = result.violations.len() as u64,
                duration_ms = table_start.elapsed().as_millis() as u64,
                "table loaded"
            );
            results.push(result);
        }

        if let Err(err) = tx.commit() {
            drop(conn);
            let _ = std::fs::remove_file(&self.options.store_path);
            warn!(error = %err, "load transaction failed, store removed");
            return Err(LoadError::Transaction(err.to_string()));
        }

        let mut report = LoadReport::new(self.options.store_path.clone(), load_order);
        for result in results {
            report.record_table(result);
        }
        report.duration_ms = start.elapsed().as_millis() as u64;

        if let Some(dir) = &self.options.report_dir {
            std::fs::create_dir_all(dir)?;
            std::fs::write(
                dir.join("load_report.json"),
                serde_json::to_vec_pretty(&report)?,
            )?;
            std::fs::write(dir.join("schema.json"), serde_json::to_vec_pretty(&specs)?)?;
        }

        info!(
            tables = report.tables.len(),
            violations = report.violations_total,
            duration_ms = report.duration_ms,
            "load completed"
        );

        Ok(LoadOutcome {
            report,
            tables: specs,
        })
    }
}

fn insert_rows(tx: &Transaction<'_>, source: &TableSource) -> Result<LoadResult, LoadError> {
    let mut result = LoadResult::new(&source.table);

    let columns: Vec<String> = source
        .header
        .iter()
        .map(|name| quote_ident(name))
        .collect();
    let placeholders: Vec<String> = (1..=source.header.len())
        .map(|idx| format!("?{idx}"))
        .collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(&source.table),
        columns.join(", "),
        placeholders.join(", ")
    );
    let mut stmt = tx.prepare(&sql)?;

    for (row_index, row) in source.rows.iter().enumerate() {
        result.rows_attempted += 1;

        // Empty strings bind as NULL, mirroring the generator's encoding of
        // absent values.
        let values: Vec<Option<&str>> = (0..source.header.len())
            .map(|idx| {
                row.get(idx)
                    .map(String::as_str)
                    .filter(|value| !value.is_empty())
            })
            .collect();

        match stmt.execute(rusqlite::params_from_iter(values.iter())) {
            Ok(_) => result.rows_committed += 1,
            Err(err) if is_constraint_violation(&err) => {
                let violation = LoadViolation {
                    code: violation_code(&err).to_string(),
                    row_index: row_index as u64,
                    message: err.to_string(),
                };
                warn!(
                    table = %source.table,
                    row_index = violation.row_index,
                    code = %violation.code,
                    "row skipped"
                );
                result.violations.push(violation);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(result)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn violation_code(err: &rusqlite::Error) -> &'static str {
    let extended = match err {
        rusqlite::Error::SqliteFailure(failure, _) => failure.extended_code,
        _ => 0,
    };
    match extended {
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => "foreign_key",
        ffi::SQLITE_CONSTRAINT_NOTNULL => "not_null",
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY => "primary_key",
        ffi::SQLITE_CONSTRAINT_UNIQUE => "unique",
        _ => "constraint",
    }
}
