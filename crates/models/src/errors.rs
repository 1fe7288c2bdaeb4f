use thiserror::Error;

/// Errors surfaced by entity helpers. Validation failures are kept
/// separate from driver errors so callers can map them to 4xx vs 5xx.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}
