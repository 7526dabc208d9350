//! Entities owned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Labels accepted for `Discussion::category`.
pub const CATEGORIES: &[&str] = &["general", "question", "announcement", "idea", "feedback"];

/// A reference to another entity: either the bare id, or the entity itself
/// once the relation has been populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Populated(T),
    Id(String),
}

impl<T> Reference<T> {
    pub fn populated(&self) -> Option<&T> {
        match self {
            Self::Populated(value) => Some(value),
            Self::Id(_) => None,
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Populated(_))
    }
}

/// Anything that can stand behind a [`Reference`].
pub trait Identified {
    fn id(&self) -> &str;
}

impl<T: Identified> Reference<T> {
    pub fn id(&self) -> &str {
        match self {
            Self::Populated(value) => value.id(),
            Self::Id(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub discussion_id: String,
    pub author_id: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Identified for Comment {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: Option<Reference<User>>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub comments: Vec<Reference<Comment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Discussion {
    /// Display name of the author, if the relation was populated.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(Reference::populated)
            .map(|user| user.name.as_str())
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(Reference::id)
    }
}
