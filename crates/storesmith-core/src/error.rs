use thiserror::Error;

/// Core error type shared across Storesmith crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog or dependency graph violates a configuration invariant.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by Storesmith crates.
pub type Result<T> = std::result::Result<T, Error>;
