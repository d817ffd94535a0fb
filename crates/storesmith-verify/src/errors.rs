use thiserror::Error;

/// Errors emitted by the verification engine.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
