use serde::{Deserialize, Serialize};

use crate::constraints::{FkAction, ForeignKeySpec, IndexSpec};
use crate::schema::{ColumnSpec, TableSpec};

/// Declared keys and indexes for one table.
///
/// Column types and nullability stay inferred from data; only the key layer
/// is declared up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableKeys {
    pub table: String,
    pub primary_key: Vec<String>,
    pub unique_columns: Vec<String>,
    pub foreign_keys: Vec<ForeignKeySpec>,
    pub extra_indexes: Vec<IndexSpec>,
}

impl TableKeys {
    /// Declaration with no keys, for tables outside the built-in catalog.
    pub fn empty(table: &str) -> Self {
        TableKeys {
            table: table.to_string(),
            primary_key: Vec::new(),
            unique_columns: Vec::new(),
            foreign_keys: Vec::new(),
            extra_indexes: Vec::new(),
        }
    }
}

/// Built-in key declarations for the e-commerce dataset.
///
/// Dependency shape: customers -> orders -> {order_items, payments};
/// products -> order_items.
pub fn ecommerce_keys() -> Vec<TableKeys> {
    vec![
        TableKeys {
            table: "customers".to_string(),
            primary_key: vec!["customer_id".to_string()],
            unique_columns: vec!["email".to_string()],
            foreign_keys: Vec::new(),
            extra_indexes: Vec::new(),
        },
        TableKeys {
            table: "products".to_string(),
            primary_key: vec!["product_id".to_string()],
            unique_columns: Vec::new(),
            foreign_keys: Vec::new(),
            extra_indexes: vec![IndexSpec {
                name: "idx_products_category".to_string(),
                column: "category".to_string(),
            }],
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
            extra_indexes: vec![IndexSpec {
                name: "idx_orders_date".to_string(),
                column: "order_date".to_string(),
            }],
        },
        TableKeys {
            table: "order_items".to_string(),
            primary_key: vec!["order_item_id".to_string()],
            unique_columns: Vec::new(),
            foreign_keys: vec![
                ForeignKeySpec {
                    column: "order_id".to_string(),
                    parent_table: "orders".to_string(),
                    parent_column: "order_id".to_string(),
                    on_delete: FkAction::Cascade,
                },
                ForeignKeySpec {
                    column: "product_id".to_string(),
                    parent_table: "products".to_string(),
                    parent_column: "product_id".to_string(),
                    on_delete: FkAction::Restrict,
                },
            ],
            extra_indexes: Vec::new(),
        },
        TableKeys {
            table: "payments".to_string(),
            primary_key: vec!["payment_id".to_string()],
            unique_columns: vec!["order_id".to_string(), "transaction_id".to_string()],
            foreign_keys: vec![ForeignKeySpec {
                column: "order_id".to_string(),
                parent_table: "orders".to_string(),
                parent_column: "order_id".to_string(),
                on_delete: FkAction::Cascade,
            }],
            extra_indexes: Vec::new(),
        },
    ]
}

/// Assemble a table spec from inferred columns and declared keys.
///
/// Primary key columns are forced non-nullable; single-column primary keys
/// and declared unique columns gain the uniqueness flag.
pub fn assemble_table(name: &str, mut columns: Vec<ColumnSpec>, keys: &TableKeys) -> TableSpec {
    for column in &mut columns {
        if keys.primary_key.contains(&column.name) {
            column.nullable = false;
            if keys.primary_key.len() == 1 {
                column.unique = true;
            }
        }
        if keys.unique_columns.contains(&column.name) {
            column.unique = true;
        }
    }

    TableSpec {
        name: name.to_string(),
        columns,
        primary_key: keys.primary_key.clone(),
        foreign_keys: keys.foreign_keys.clone(),
        indexes: keys.extra_indexes.clone(),
    }
}
