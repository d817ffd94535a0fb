//! Schema inference for Storesmith.
//!
//! Takes header-derived string rows and produces typed column specs before
//! any storage interaction. Pure functions of their input; types are never
//! inferred lazily during insertion.

pub mod columns;

pub use columns::infer_columns;
