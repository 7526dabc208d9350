//! What a pipeline hands back to the transport.

use crate::flash::FlashMessage;

pub const SEE_OTHER: u16 = 303;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Redirect(String),
    Html(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    pub status: u16,
    pub body: ResponseBody,
    /// Flash messages to surface on the next rendered page.
    pub flash: Vec<FlashMessage>,
}

impl BoardResponse {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: SEE_OTHER,
            body: ResponseBody::Redirect(location.into()),
            flash: Vec::new(),
        }
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Html(body.into()),
            flash: Vec::new(),
        }
    }

    pub fn with_flash(mut self, flash: Vec<FlashMessage>) -> Self {
        self.flash = flash;
        self
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.body, ResponseBody::Redirect(_))
    }

    pub fn location(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Redirect(location) => Some(location),
            ResponseBody::Html(_) => None,
        }
    }

    pub fn html_body(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Html(body) => Some(body),
            ResponseBody::Redirect(_) => None,
        }
    }
}
