//! Seeded synthesis of the e-commerce dataset.
//!
//! Produces the five CSV tables (customers, products, orders, order_items,
//! payments) with intact foreign-key relationships, plus a generation
//! report. Identical seed and options yield byte-identical output.

pub mod engine;
pub mod errors;
pub mod model;
pub mod output;

pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport, TableReport};
