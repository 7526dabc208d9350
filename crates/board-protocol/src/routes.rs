//! Route paths and view templates.
//!
//! Every path the server redirects to, and every template it renders, is
//! named here.

/// All board paths.
pub struct Routes;

impl Routes {
    pub const ROOT: &str = "/";
    pub const HEALTH: &str = "/health";

    // ── Discussions ─────────────────────────────────────────────────────
    pub const DISCUSSIONS: &str = "/discussions";
    pub const DISCUSSIONS_NEW: &str = "/discussions/new";
    pub const DISCUSSIONS_CREATE: &str = "/discussions/create";
    pub const DISCUSSION: &str = "/discussions/{id}";
    pub const DISCUSSION_EDIT: &str = "/discussions/{id}/edit";
    pub const DISCUSSION_UPDATE: &str = "/discussions/{id}/update";
    pub const DISCUSSION_DELETE: &str = "/discussions/{id}/delete";

    /// Detail page of one discussion.
    pub fn discussion(id: &str) -> String {
        format!("/discussions/{id}")
    }

    pub fn discussion_edit(id: &str) -> String {
        format!("/discussions/{id}/edit")
    }

    pub fn discussion_update(id: &str) -> String {
        format!("/discussions/{id}/update")
    }

    pub fn discussion_delete(id: &str) -> String {
        format!("/discussions/{id}/delete")
    }
}

/// A rendered view: template identifier plus the page id and title shown in
/// navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    New,
    Index,
    Show,
    Edit,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Self::New => "discussions/new",
            Self::Index => "discussions/index",
            Self::Show => "discussions/show",
            Self::Edit => "discussions/edit",
        }
    }

    pub fn page(&self) -> &'static str {
        match self {
            Self::New => "new-discussion",
            Self::Index => "discussions",
            Self::Show => "discussion-details",
            Self::Edit => "edit-discussion",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::New => "New Discussion",
            Self::Index => "All Discussions",
            Self::Show => "Discussion Details",
            Self::Edit => "Edit Discussion",
        }
    }
}
