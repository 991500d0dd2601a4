use thiserror::Error;

/// Failures of the persistence collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt stored data: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("file path has no parent directory: {0}")]
    MissingParent(String),
    #[error("temporary file could not be persisted: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type StoreResult<T> = Result<T, StoreError>;
