use serde::{Deserialize, Serialize};

/// Referential action applied when a parent row is deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FkAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
}

/// Foreign key from one child column to a parent column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeySpec {
    pub column: String,
    pub parent_table: String,
    pub parent_column: String,
    pub on_delete: FkAction,
}

/// Single-column index requested on top of the derived foreign-key indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub column: String,
}
