use thiserror::Error;

/// Errors emitted by the load engine.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Configuration(#[from] storesmith_core::Error),
    #[error("transaction failed: {0}")]
    Transaction(String),
    #[error("load left {0} unresolved constraint violations")]
    Violations(u64),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn config_error(message: String) -> LoadError {
    LoadError::Configuration(storesmith_core::Error::Configuration(message))
}
