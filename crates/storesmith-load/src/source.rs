use std::path::{Path, PathBuf};

use crate::errors::{LoadError, config_error};

/// Header plus string rows for one table, as supplied by the generator.
#[derive(Debug, Clone)]
pub struct TableSource {
    pub table: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read every `*.csv` file in a directory as a table source.
///
/// The table name is the file stem; sources come back sorted by file name,
/// though the loader reorders them by the dependency graph anyway.
pub fn read_csv_dir(dir: &Path) -> Result<Vec<TableSource>, LoadError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        sources.push(read_csv_file(path)?);
    }
    Ok(sources)
}

/// Read a single CSV file as a table source.
pub fn read_csv_file(path: &Path) -> Result<TableSource, LoadError> {
    let table = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| config_error(format!("invalid csv path: {}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(TableSource {
        table,
        header,
        rows,
    })
}
