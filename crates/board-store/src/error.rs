use board_protocol::BoardError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Discussion not found: {0}")]
    NotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Validation failed: {0}")]
    Schema(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    Task(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidId(_))
    }
}

impl From<StoreError> for BoardError {
    fn from(err: StoreError) -> Self {
        match err {
            // A malformed identifier names nothing that could exist.
            StoreError::NotFound(_) | StoreError::InvalidId(_) => {
                BoardError::not_found(err.to_string())
            }
            StoreError::Schema(_) => BoardError::invalid_params(err.to_string()),
            StoreError::Database(_) | StoreError::Serialization(_) | StoreError::Task(_) => {
                BoardError::storage(err.to_string())
            }
        }
    }
}
