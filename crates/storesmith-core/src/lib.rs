//! Core contracts and helpers for Storesmith.
//!
//! This crate defines the canonical table model, the built-in e-commerce
//! key catalog, dependency ordering, and validation shared across the
//! pipeline crates.

pub mod catalog;
pub mod constraints;
pub mod error;
pub mod graph;
pub mod schema;
pub mod validation;

pub use catalog::{TableKeys, assemble_table, ecommerce_keys};
pub use constraints::{FkAction, ForeignKeySpec, IndexSpec};
pub use error::{Error, Result};
pub use graph::{DependencyReport, DependencySummary, build_dependency_report};
pub use schema::{ColumnSpec, SemanticType, TableSpec};
pub use validation::validate_catalog;
