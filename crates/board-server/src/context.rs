//! Per-request scratchpad threaded through a pipeline.

use board_protocol::{Discussion, FlashMessage};

/// Request-scoped locals.
///
/// Built once when a pipeline starts, passed `&mut` to every stage, and
/// dropped when the response has been produced. Never shared across
/// requests.
#[derive(Debug, Default)]
pub struct Locals {
    /// Pending redirect target.
    pub redirect: Option<String>,
    /// The discussion loaded (or written) by the handler.
    pub discussion: Option<Discussion>,
    pub discussions: Vec<Discussion>,
    /// Set by create after a successful insert.
    pub created: bool,
    /// Set by validation when the submission failed; create then persists nothing.
    pub skip: bool,
    /// Outgoing flash messages.
    pub flash: Vec<FlashMessage>,
}
