//! Discussion board - shared types
//!
//! Entities owned by the store, the submitted-form projection, flash
//! messages, the request and response shapes exchanged between transport
//! and server, route paths and view templates. This crate is the single
//! source of truth for every path and template name the server uses.

pub mod error;
pub mod flash;
pub mod form;
pub mod models;
pub mod request;
pub mod response;
pub mod routes;

pub use error::{BoardError, BoardErrorCode};
pub use flash::{FlashMessage, Severity};
pub use form::{DiscussionParams, FormFields};
pub use models::{CATEGORIES, Comment, Discussion, Identified, Reference, User};
pub use request::{Action, BoardRequest};
pub use response::{BoardResponse, ResponseBody};
pub use routes::{Routes, Template};
