use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Listing {0} not found")]
    NotFound(u64),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
