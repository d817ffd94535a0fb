use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;
use storesmith_core::{FkAction, ForeignKeySpec, TableKeys};
use storesmith_load::{LoadEngine, LoadError, LoadOptions, TableSource, open_read_only};

fn temp_store(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("storesmith_load_{label}_{}.db", uuid::Uuid::new_v4()));
    path
}

fn source(table: &str, header: &[&str], rows: &[&[&str]]) -> TableSource {
    TableSource {
        table: table.to_string(),
        header: header.iter().map(|name| name.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|value| value.to_string()).collect())
            .collect(),
    }
}

fn customer_order_keys() -> Vec<TableKeys> {
    vec![
        TableKeys {
            table: "customers".to_string(),
            primary_key: vec!["customer_id".to_string()],
            unique_columns: vec!["email".to_string()],
            foreign_keys: Vec::new(),
            extra_indexes: Vec::new(),
        },
        TableKeys {
            table: "orders".to_string(),
            primary_key: vec!["order_id".to_string()],
            unique_columns: Vec::new(),
            foreign_keys: vec![ForeignKeySpec {
                column: "customer_id".to_string(),
                parent_table: "customers".to_string(),
                parent_column: "customer_id".to_string(),
                on_delete: FkAction::Cascade,
            }],
            extra_indexes: Vec::new(),
        },
    ]
}

fn customers_source() -> TableSource {
    source(
        "customers",
        &["customer_id", "email"],
        &[
            &["1", "ada@example.com"],
            &["2", "grace@example.com"],
            &["3", "edsger@example.com"],
        ],
    )
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .expect("count rows")
}

#[test]
fn commits_all_rows_without_conflicts() {
    let store = temp_store("clean");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let orders = source(
        "orders",
        &["order_id", "customer_id", "total_amount"],
        &[&["10", "1", "99.95"], &["11", "3", "15.00"]],
    );

    let outcome = engine
        .run(&[customers_source(), orders], &customer_order_keys())
        .expect("load");

    assert_eq!(outcome.report.violations_total, 0);
    for result in &outcome.report.tables {
        assert_eq!(result.rows_attempted, result.rows_committed);
        assert!(result.violations.is_empty());
    }

    let conn = Connection::open(&store).expect("open store");
    assert_eq!(count(&conn, "customers"), 3);
    assert_eq!(count(&conn, "orders"), 2);
}

#[test]
fn skips_row_with_missing_parent_and_continues() {
    let store = temp_store("fk");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let orders = source(
        "orders",
        &["order_id", "customer_id"],
        &[
            &["10", "1"],
            &["11", "2"],
            &["12", "999"],
            &["13", "3"],
            &["14", "1"],
        ],
    );

    let outcome = engine
        .run(&[customers_source(), orders], &customer_order_keys())
        .expect("load");

    let customers = outcome.report.table("customers").expect("customers result");
    assert_eq!(customers.rows_committed, 3);

    let orders = outcome.report.table("orders").expect("orders result");
    assert_eq!(orders.rows_attempted, 5);
    assert_eq!(orders.rows_committed, 4);
    assert_eq!(orders.violations.len(), 1);
    assert_eq!(orders.violations[0].code, "foreign_key");
    assert_eq!(orders.violations[0].row_index, 2);

    let conn = Connection::open(&store).expect("open store");
    assert_eq!(count(&conn, "orders"), 4);
}

#[test]
fn records_duplicate_primary_key_violation() {
    let store = temp_store("pk");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let customers = source(
        "customers",
        &["customer_id", "email"],
        &[
            &["1", "ada@example.com"],
            &["1", "grace@example.com"],
            &["2", "edsger@example.com"],
        ],
    );

    let outcome = engine
        .run(&[customers], &customer_order_keys())
        .expect("load");

    let result = outcome.report.table("customers").expect("customers result");
    assert_eq!(result.rows_committed, 2);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].code, "primary_key");
}

#[test]
fn records_unique_violation_on_declared_column() {
    let store = temp_store("unique");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let customers = source(
        "customers",
        &["customer_id", "email"],
        &[&["1", "ada@example.com"], &["2", "ada@example.com"]],
    );

    let outcome = engine
        .run(&[customers], &customer_order_keys())
        .expect("load");

    let result = outcome.report.table("customers").expect("customers result");
    assert_eq!(result.rows_committed, 1);
    assert_eq!(result.violations[0].code, "unique");
}

#[test]
fn empty_text_primary_key_is_not_null_violation() {
    let store = temp_store("notnull");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let keys = vec![TableKeys {
        table: "tags".to_string(),
        primary_key: vec!["name".to_string()],
        unique_columns: Vec::new(),
        foreign_keys: Vec::new(),
        extra_indexes: Vec::new(),
    }];
    let tags = source("tags", &["name", "color"], &[&["alpha", "red"], &["", "blue"]]);

    let outcome = engine.run(&[tags], &keys).expect("load");

    let result = outcome.report.table("tags").expect("tags result");
    assert_eq!(result.rows_committed, 1);
    assert_eq!(result.violations[0].code, "not_null");
}

#[test]
fn unknown_parent_table_fails_before_ddl() {
    let store = temp_store("config");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let orders = source("orders", &["order_id", "customer_id"], &[&["10", "1"]]);

    let err = engine
        .run(&[orders], &customer_order_keys())
        .expect_err("missing parent");
    assert!(matches!(err, LoadError::Configuration(_)));
    assert!(err.to_string().contains("referenced table not found"));
    assert!(!store.exists());
}

#[test]
fn cyclic_graph_fails_before_ddl() {
    let store = temp_store("cycle");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let keys = vec![
        TableKeys {
            table: "a".to_string(),
            primary_key: vec!["id".to_string()],
            unique_columns: Vec::new(),
            foreign_keys: vec![ForeignKeySpec {
                column: "b_id".to_string(),
                parent_table: "b".to_string(),
                parent_column: "id".to_string(),
                on_delete: FkAction::NoAction,
            }],
            extra_indexes: Vec::new(),
        },
        TableKeys {
            table: "b".to_string(),
            primary_key: vec!["id".to_string()],
            unique_columns: Vec::new(),
            foreign_keys: vec![ForeignKeySpec {
                column: "a_id".to_string(),
                parent_table: "a".to_string(),
                parent_column: "id".to_string(),
                on_delete: FkAction::NoAction,
            }],
            extra_indexes: Vec::new(),
        },
    ];

    let a = source("a", &["id", "b_id"], &[&["1", "1"]]);
    let b = source("b", &["id", "a_id"], &[&["1", "1"]]);

    let err = engine.run(&[a, b], &keys).expect_err("cycle");
    assert!(err.to_string().contains("cyclic dependency graph"));
    assert!(!store.exists());
}

#[test]
fn empty_input_creates_empty_store() {
    let store = temp_store("empty");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let outcome = engine.run(&[], &[]).expect("load");
    assert!(outcome.report.tables.is_empty());
    assert_eq!(outcome.report.violations_total, 0);
    assert!(store.exists());

    let conn = Connection::open(&store).expect("open store");
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .expect("count tables");
    assert_eq!(tables, 0);
}

#[test]
fn rerun_recreates_identical_store() {
    let store = temp_store("rerun");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });
    let keys = customer_order_keys();

    let first = engine
        .run(&[customers_source()], &keys)
        .expect("first load");
    let second = engine
        .run(&[customers_source()], &keys)
        .expect("second load");

    assert_eq!(
        first.report.table("customers").unwrap().rows_committed,
        second.report.table("customers").unwrap().rows_committed
    );

    let conn = Connection::open(&store).expect("open store");
    assert_eq!(count(&conn, "customers"), 3);
    let schema_sql: String = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'customers'",
            [],
            |row| row.get(0),
        )
        .expect("schema sql");
    assert!(schema_sql.contains("PRIMARY KEY"));
}

#[test]
fn input_order_does_not_matter() {
    let store = temp_store("order");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let orders = source("orders", &["order_id", "customer_id"], &[&["10", "1"]]);

    // Child listed first; the loader must still insert parents first.
    let outcome = engine
        .run(&[orders, customers_source()], &customer_order_keys())
        .expect("load");

    assert_eq!(outcome.report.violations_total, 0);
    assert_eq!(outcome.report.load_order[0], "customers");
}

#[test]
fn read_only_handle_is_gated_on_violations() {
    let store = temp_store("gate");
    let engine = LoadEngine::new(LoadOptions {
        store_path: store.clone(),
        report_dir: None,
    });

    let customers = source(
        "customers",
        &["customer_id", "email"],
        &[&["1", "ada@example.com"], &["1", "grace@example.com"]],
    );

    let outcome = engine
        .run(&[customers], &customer_order_keys())
        .expect("load");
    assert_eq!(outcome.report.violations_total, 1);

    let refused = open_read_only(&store, &outcome.report, false);
    assert!(matches!(refused, Err(LoadError::Violations(1))));

    let conn = open_read_only(&store, &outcome.report, true).expect("accept partial");
    assert_eq!(count(&conn, "customers"), 1);

    let write_attempt = conn.execute("INSERT INTO customers (customer_id) VALUES (9)", []);
    assert!(write_attempt.is_err());
}

#[test]
fn reads_csv_sources_from_directory() {
    let mut dir = std::env::temp_dir();
    dir.push(format!("storesmith_load_csv_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");

    fs::write(
        dir.join("customers.csv"),
        "customer_id,email\n1,ada@example.com\n2,grace@example.com\n",
    )
    .expect("write csv");

    let sources = storesmith_load::read_csv_dir(&dir).expect("read dir");
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].table, "customers");
    assert_eq!(sources[0].header, vec!["customer_id", "email"]);
    assert_eq!(sources[0].rows.len(), 2);
    assert_eq!(sources[0].rows[1][1], "grace@example.com");
}
