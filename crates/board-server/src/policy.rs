//! Per-operation store failure policy.

use board_protocol::BoardError;
use board_store::StoreError;
use tracing::{error, warn};

use crate::pipeline::{Flow, StageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log, then hand the error to the generic error handler.
    Propagate,
    /// Log, then continue as though the call succeeded.
    Swallow,
}

/// The store-backed controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Index,
    Show,
    Edit,
    Update,
    Delete,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Index => "index",
            Self::Show => "show",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Delete is the only operation that absorbs its failures.
    pub fn policy(&self) -> ErrorPolicy {
        match self {
            Self::Delete => ErrorPolicy::Swallow,
            Self::Create | Self::Index | Self::Show | Self::Edit | Self::Update => {
                ErrorPolicy::Propagate
            }
        }
    }

    /// Log a store failure and apply this operation's policy.
    pub fn fail(&self, err: StoreError) -> StageResult {
        match self.policy() {
            ErrorPolicy::Propagate => {
                error!(operation = self.name(), "Store failure: {err}");
                Err(BoardError::from(err))
            }
            ErrorPolicy::Swallow => {
                warn!(operation = self.name(), "Store failure ignored: {err}");
                Ok(Flow::Continue)
            }
        }
    }
}
