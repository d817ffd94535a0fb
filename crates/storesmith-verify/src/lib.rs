//! Post-load integrity verification.
//!
//! Confirms committed row counts against the load report, scans every
//! declared foreign key for orphaned child rows, and runs amount
//! consistency checks over the e-commerce tables. Read-only; a failing
//! verification is a diagnostic for the caller, never a rollback.

pub mod engine;
pub mod errors;
pub mod model;
pub mod report;

pub use engine::VerificationEngine;
pub use errors::VerifyError;
pub use model::{CheckStatus, ForeignKeyCheck, RowCountCheck, VerifyReport, VerifyWarning};
pub use report::render_report;
