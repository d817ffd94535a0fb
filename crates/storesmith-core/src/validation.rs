use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::schema::TableSpec;

/// Validate internal consistency of an assembled catalog.
///
/// This checks:
/// - duplicate tables/columns
/// - primary key and index columns exist
/// - foreign key columns and referenced targets exist
pub fn validate_catalog(tables: &[TableSpec]) -> Result<()> {
    let mut catalog: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for table in tables {
        if catalog.contains_key(&table.name) {
            return Err(Error::Configuration(format!(
                "duplicate table name: {}",
                table.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.clone()) {
                return Err(Error::Configuration(format!(
                    "duplicate column name: {}.{}",
                    table.name, column.name
                )));
            }
        }

        catalog.insert(table.name.clone(), columns);
    }

    for table in tables {
        let columns = catalog.get(&table.name).ok_or_else(|| {
            Error::Configuration(format!("missing table in catalog: {}", table.name))
        })?;

        for column in &table.primary_key {
            if !columns.contains(column) {
                return Err(Error::Configuration(format!(
                    "primary key column not found: {}.{}",
                    table.name, column
                )));
            }
        }

        for fk in &table.foreign_keys {
            if !columns.contains(&fk.column) {
                return Err(Error::Configuration(format!(
                    "foreign key column not found: {}.{}",
                    table.name, fk.column
                )));
            }

            let parent_columns = catalog.get(&fk.parent_table).ok_or_else(|| {
                Error::Configuration(format!("referenced table not found: {}", fk.parent_table))
            })?;

            if !parent_columns.contains(&fk.parent_column) {
                return Err(Error::Configuration(format!(
                    "referenced column not found: {}.{}",
                    fk.parent_table, fk.parent_column
                )));
            }
        }

        for index in &table.indexes {
            if !columns.contains(&index.column) {
                return Err(Error::Configuration(format!(
                    "index column not found: {}.{}",
                    table.name, index.column
                )));
            }
        }
    }

    Ok(())
}
