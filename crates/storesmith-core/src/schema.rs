use serde::{Deserialize, Serialize};

use crate::constraints::{ForeignKeySpec, IndexSpec};

/// Semantic column type inferred from raw string values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Integer,
    Real,
    Text,
    Date,
}

/// Column metadata derived from input data and declared keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub semantic_type: SemanticType,
    pub nullable: bool,
    pub unique: bool,
}

/// Structural description of one table: columns, keys, and indexes.
///
/// Built once per load run from inferred columns plus declared keys,
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeySpec>,
    pub indexes: Vec<IndexSpec>,
}

impl TableSpec {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }
}
