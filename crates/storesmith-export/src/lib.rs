//! Flattened export of the populated store.
//!
//! Runs the five-table transaction-detail join against a read-only store
//! handle and serializes the result to CSV, with summary statistics for
//! the run report. All business arithmetic lives in the query text; the
//! export writes what the query returns.

pub mod engine;
pub mod errors;
pub mod model;
pub mod query;

pub use engine::ExportEngine;
pub use errors::ExportError;
pub use model::{ExportOptions, ExportReport, SummaryStats};
