//! Schema-inferring bulk load into an embedded SQLite store.
//!
//! Infers column types from header-derived string rows, creates tables with
//! keys and indexes in dependency order inside one exclusive transaction,
//! streams rows through parameterized inserts, and records per-row
//! constraint violations instead of aborting the run.

pub mod ddl;
pub mod engine;
pub mod errors;
pub mod model;
pub mod source;
pub mod store;

pub use ddl::build_ddl;
pub use engine::{LoadEngine, LoadOutcome};
pub use errors::LoadError;
pub use model::{LoadOptions, LoadReport, LoadResult, LoadViolation};
pub use source::{TableSource, read_csv_dir, read_csv_file};
pub use store::open_read_only;
