use std::collections::BTreeMap;

use storesmith_core::{FkAction, SemanticType, TableSpec};

/// Emit `CREATE TABLE` and `CREATE INDEX` statements following `order`.
///
/// `order` must list parents before children; per table the create statement
/// comes first, then one derived index per foreign-key column, then any
/// explicitly requested index.
pub fn build_ddl(tables: &[TableSpec], order: &[String]) -> Vec<String> {
    let by_name: BTreeMap<&str, &TableSpec> = tables
        .iter()
        .map(|table| (table.name.as_str(), table))
        .collect();

    let mut statements = Vec::new();
    for name in order {
        let Some(table) = by_name.get(name.as_str()) else {
            continue;
        };

        statements.push(create_table_sql(table));

        for fk in &table.foreign_keys {
            statements.push(create_index_sql(
                &table.name,
                &fk_index_name(&table.name, &fk.column),
                &fk.column,
            ));
        }
        for index in &table.indexes {
            statements.push(create_index_sql(&table.name, &index.name, &index.column));
        }
    }

    statements
}

fn create_table_sql(table: &TableSpec) -> String {
    let mut lines: Vec<String> = Vec::new();

    for column in &table.columns {
        let sql_type = sql_type(column.semantic_type);
        let mut line = format!("    {} {}", quote_ident(&column.name), sql_type);

        let single_pk = table.primary_key.len() == 1 && table.primary_key[0] == column.name;
        if single_pk {
            line.push_str(" PRIMARY KEY");
            // INTEGER PRIMARY KEY aliases the rowid and is implicitly
            // non-null; every other type needs the clause spelled out.
            if column.semantic_type != SemanticType::Integer {
                line.push_str(" NOT NULL");
            }
        } else {
            if !column.nullable {
                line.push_str(" NOT NULL");
            }
            if column.unique {
                line.push_str(" UNIQUE");
            }
        }

        lines.push(line);
    }

    if table.primary_key.len() > 1 {
        let columns: Vec<String> = table
            .primary_key
            .iter()
            .map(|column| quote_ident(column))
            .collect();
        lines.push(format!("    PRIMARY KEY ({})", columns.join(", ")));
    }

    for fk in &table.foreign_keys {
        lines.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {}",
            quote_ident(&fk.column),
            quote_ident(&fk.parent_table),
            quote_ident(&fk.parent_column),
            action_sql(fk.on_delete)
        ));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);",
        quote_ident(&table.name),
        lines.join(",\n")
    )
}

fn create_index_sql(table: &str, name: &str, column: &str) -> String {
    format!(
        "CREATE INDEX {} ON {} ({});",
        quote_ident(name),
        quote_ident(table),
        quote_ident(column)
    )
}

/// Derived index name for a foreign-key column, `idx_orders_customer` style.
fn fk_index_name(table: &str, column: &str) -> String {
    let stem = column.strip_suffix("_id").unwrap_or(column);
    format!("idx_{table}_{stem}")
}

/// Deterministic SQLite type for a semantic type. Dates are declared as
/// TIMESTAMP, which SQLite stores with text affinity for our values.
fn sql_type(semantic_type: SemanticType) -> &'static str {
    match semantic_type {
        SemanticType::Integer => "INTEGER",
        SemanticType::Real => "REAL",
        SemanticType::Text => "TEXT",
        SemanticType::Date => "TIMESTAMP",
    }
}

fn action_sql(action: FkAction) -> &'static str {
    match action {
        FkAction::NoAction => "NO ACTION",
        FkAction::Restrict => "RESTRICT",
        FkAction::Cascade => "CASCADE",
        FkAction::SetNull => "SET NULL",
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
