use storesmith_core::{
    ColumnSpec, Error, FkAction, ForeignKeySpec, SemanticType, TableSpec, validate_catalog,
};

fn column(name: &str) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        semantic_type: SemanticType::Integer,
        nullable: false,
        unique: false,
    }
}

fn table(name: &str, columns: Vec<ColumnSpec>) -> TableSpec {
    TableSpec {
        name: name.to_string(),
        columns,
        primary_key: Vec::new(),
        foreign_keys: Vec::new(),
        indexes: Vec::new(),
    }
}

#[test]
fn accepts_consistent_catalog() {
    let mut orders = table("orders", vec![column("order_id"), column("customer_id")]);
    orders.primary_key = vec!["order_id".to_string()];
    orders.foreign_keys = vec![ForeignKeySpec {
        column: "customer_id".to_string(),
        parent_table: "customers".to_string(),
        parent_column: "customer_id".to_string(),
        on_delete: FkAction::Cascade,
    }];

    let customers = table("customers", vec![column("customer_id")]);

    assert!(validate_catalog(&[customers, orders]).is_ok());
}

#[test]
fn rejects_duplicate_table_names() {
    let tables = vec![
        table("customers", vec![column("customer_id")]),
        table("customers", vec![column("customer_id")]),
    ];

    let err = validate_catalog(&tables).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(err.to_string().contains("duplicate table name"));
}

#[test]
fn rejects_unknown_parent_table() {
    let mut orders = table("orders", vec![column("order_id"), column("customer_id")]);
    orders.foreign_keys = vec![ForeignKeySpec {
        column: "customer_id".to_string(),
        parent_table: "customers".to_string(),
        parent_column: "customer_id".to_string(),
        on_delete: FkAction::Cascade,
    }];

    let err = validate_catalog(&[orders]).unwrap_err();
    assert!(err.to_string().contains("referenced table not found"));
}

#[test]
fn rejects_missing_primary_key_column() {
    let mut payments = table("payments", vec![column("payment_id")]);
    payments.primary_key = vec!["id".to_string()];

    let err = validate_catalog(&[payments]).unwrap_err();
    assert!(err.to_string().contains("primary key column not found"));
}

#[test]
fn builtin_catalog_assembles_clean() {
    let keys = storesmith_core::ecommerce_keys();
    let tables: Vec<TableSpec> = keys
        .iter()
        .map(|entry| {
            let mut names: Vec<&String> = entry.primary_key.iter().collect();
            names.extend(entry.foreign_keys.iter().map(|fk| &fk.column));
            names.extend(entry.unique_columns.iter());
            names.extend(entry.extra_indexes.iter().map(|index| &index.column));
            names.dedup();
            let columns = names.iter().map(|name| column(name)).collect();
            storesmith_core::assemble_table(&entry.table, columns, entry)
        })
        .collect();

    assert!(validate_catalog(&tables).is_ok());
}
