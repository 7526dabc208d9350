//! Board error types and their HTTP status mapping.

use serde::{Deserialize, Serialize};

/// Error classes surfaced to the generic error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoardErrorCode {
    /// The addressed entity does not exist (or its id cannot exist).
    NotFound,
    /// Submitted data was rejected by the store's schema.
    InvalidParams,
    /// The store failed operationally.
    Storage,
    /// Anything else.
    Internal,
}

impl BoardErrorCode {
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::InvalidParams => 400,
            Self::Storage | Self::Internal => 500,
        }
    }
}

/// An error propagated out of a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardError {
    pub code: BoardErrorCode,
    pub message: String,
}

impl BoardError {
    pub fn new(code: BoardErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::NotFound, message)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::InvalidParams, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::Storage, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::Internal, message)
    }

    pub fn status(&self) -> u16 {
        self.code.status()
    }

    pub fn is_not_found(&self) -> bool {
        self.code == BoardErrorCode::NotFound
    }
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board Error [{}]: {}", self.status(), self.message)
    }
}

impl std::error::Error for BoardError {}
