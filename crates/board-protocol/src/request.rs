//! Inbound request as seen by the pipeline, and the action it addresses.

use crate::flash::FlashMessage;
use crate::form::FormFields;

/// One controller action per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    New,
    Create,
    Index,
    Show,
    Edit,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Self::New,
        Self::Create,
        Self::Index,
        Self::Show,
        Self::Edit,
        Self::Update,
        Self::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Create => "create",
            Self::Index => "index",
            Self::Show => "show",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// A request after the transport has taken it apart.
#[derive(Debug, Clone)]
pub struct BoardRequest {
    pub action: Action,
    /// Discussion id from the path, for member routes.
    pub id: Option<String>,
    /// Submitted form fields.
    pub fields: FormFields,
    /// Id of the already-authenticated acting user, if any.
    pub user: Option<String>,
    /// Flash messages left by the previous request.
    pub flash: Vec<FlashMessage>,
}

impl BoardRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            id: None,
            fields: FormFields::default(),
            user: None,
            flash: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_fields(mut self, fields: FormFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_flash(mut self, flash: Vec<FlashMessage>) -> Self {
        self.flash = flash;
        self
    }
}
