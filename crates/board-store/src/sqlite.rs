//! SQLite-backed discussion store.

use std::path::Path;
use std::sync::Arc;

use board_protocol::{CATEGORIES, Comment, Discussion, DiscussionParams, Reference, User};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{OptionalExtension, params, types::Value as SqlValue};
use tracing::{debug, info};

use crate::{Populate, Store, StoreError, StoreResult};

// ─────────────────────────────────────────────────────────────────────────────
// Database wrapper (rusqlite is sync — we run it on spawn_blocking)
// ─────────────────────────────────────────────────────────────────────────────

const DISCUSSION_COLUMNS: &str =
    "id, title, description, author_id, category, tags, views, created_at, updated_at";

/// A discussion as stored, before relations are resolved.
struct DiscussionRow {
    id: String,
    title: String,
    description: String,
    author_id: Option<String>,
    category: Option<String>,
    tags: String,
    views: i64,
    created_at: i64,
    updated_at: i64,
}

struct SqliteDb {
    conn: rusqlite::Connection,
}

impl SqliteDb {
    fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = rusqlite::Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")?;
        Self::with_connection(conn)
    }

    fn open_in_memory() -> StoreResult<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: rusqlite::Connection) -> StoreResult<Self> {
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL,
                created_at  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS discussions (
                seq         INTEGER PRIMARY KEY AUTOINCREMENT,
                id          TEXT NOT NULL UNIQUE,
                title       TEXT NOT NULL,
                description TEXT NOT NULL,
                author_id   TEXT,
                category    TEXT,
                tags        TEXT NOT NULL DEFAULT '[]',
                views       INTEGER NOT NULL DEFAULT 0,
                created_at  INTEGER NOT NULL,
                updated_at  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS comments (
                seq           INTEGER PRIMARY KEY AUTOINCREMENT,
                id            TEXT NOT NULL UNIQUE,
                discussion_id TEXT NOT NULL REFERENCES discussions(id) ON DELETE CASCADE,
                author_id     TEXT,
                content       TEXT NOT NULL,
                created_at    INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_comments_discussion ON comments(discussion_id, seq);
            ",
        )?;
        Ok(())
    }

    // ── Discussion CRUD ──────────────────────────────────────────────────

    fn insert_discussion(&self, params: &DiscussionParams) -> StoreResult<String> {
        check_schema(params)?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = now_ms();
        let tags = serde_json::to_string(params.tags.as_deref().unwrap_or_default())?;

        self.conn.execute(
            "INSERT INTO discussions (id, title, description, author_id, category, tags, views, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)",
            params![
                id,
                params.title,
                params.description,
                params.author,
                params.category,
                tags,
                now,
            ],
        )?;
        Ok(id)
    }

    fn load_discussion(&self, id: &str, populate: Populate) -> StoreResult<Option<Discussion>> {
        let sql = format!("SELECT {DISCUSSION_COLUMNS} FROM discussions WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, params![id], row_to_discussion)
            .optional()?;
        row.map(|row| self.hydrate(row, populate)).transpose()
    }

    fn list_discussions(&self, populate: Populate) -> StoreResult<Vec<Discussion>> {
        let sql = format!("SELECT {DISCUSSION_COLUMNS} FROM discussions ORDER BY seq");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_discussion)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|row| self.hydrate(row, populate))
            .collect()
    }

    /// Single `UPDATE` over the submitted fields. Returns whether a row matched.
    fn update_discussion(&self, id: &str, params: &DiscussionParams) -> StoreResult<bool> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(title) = &params.title {
            sets.push("title = ?");
            values.push(SqlValue::Text(title.clone()));
        }
        if let Some(description) = &params.description {
            sets.push("description = ?");
            values.push(SqlValue::Text(description.clone()));
        }
        if let Some(author) = &params.author {
            sets.push("author_id = ?");
            values.push(SqlValue::Text(author.clone()));
        }
        if let Some(category) = &params.category {
            sets.push("category = ?");
            values.push(SqlValue::Text(category.clone()));
        }
        if let Some(tags) = &params.tags {
            sets.push("tags = ?");
            values.push(SqlValue::Text(serde_json::to_string(tags)?));
        }
        sets.push("updated_at = ?");
        values.push(SqlValue::Integer(now_ms()));
        values.push(SqlValue::Text(id.to_string()));

        let sql = format!("UPDATE discussions SET {} WHERE id = ?", sets.join(", "));
        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(changed > 0)
    }

    fn delete_discussion(&self, id: &str) -> StoreResult<Option<Discussion>> {
        let existing = self.load_discussion(id, Populate::NONE)?;
        if existing.is_some() {
            self.conn
                .execute("DELETE FROM discussions WHERE id = ?1", params![id])?;
        }
        Ok(existing)
    }

    fn set_views(&self, id: &str, views: u64) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE discussions SET views = ?1 WHERE id = ?2",
            params![views as i64, id],
        )?;
        Ok(changed > 0)
    }

    // ── Users and comments ───────────────────────────────────────────────

    fn insert_user(&self, name: &str, email: &str) -> StoreResult<User> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: from_ms(now_ms()),
        };
        self.conn.execute(
            "INSERT INTO users (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id, user.name, user.email, user.created_at.timestamp_millis()],
        )?;
        Ok(user)
    }

    fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email, created_at FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        created_at: from_ms(row.get(3)?),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn insert_comment(
        &self,
        discussion_id: &str,
        author_id: Option<&str>,
        content: &str,
    ) -> StoreResult<Comment> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM discussions WHERE id = ?1)",
            params![discussion_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::NotFound(discussion_id.to_string()));
        }

        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            discussion_id: discussion_id.to_string(),
            author_id: author_id.map(str::to_string),
            content: content.to_string(),
            created_at: from_ms(now_ms()),
        };
        self.conn.execute(
            "INSERT INTO comments (id, discussion_id, author_id, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment.id,
                comment.discussion_id,
                comment.author_id,
                comment.content,
                comment.created_at.timestamp_millis(),
            ],
        )?;
        Ok(comment)
    }

    fn comments_for(&self, discussion_id: &str) -> StoreResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, discussion_id, author_id, content, created_at FROM comments WHERE discussion_id = ?1 ORDER BY seq",
        )?;
        let comments = stmt
            .query_map(params![discussion_id], |row| {
                Ok(Comment {
                    id: row.get(0)?,
                    discussion_id: row.get(1)?,
                    author_id: row.get(2)?,
                    content: row.get(3)?,
                    created_at: from_ms(row.get(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn comment_ids_for(&self, discussion_id: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM comments WHERE discussion_id = ?1 ORDER BY seq")?;
        let ids = stmt
            .query_map(params![discussion_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    // ── Population ───────────────────────────────────────────────────────

    fn hydrate(&self, row: DiscussionRow, populate: Populate) -> StoreResult<Discussion> {
        let tags: Vec<String> = serde_json::from_str(&row.tags)?;

        let author = match row.author_id {
            Some(author_id) if populate.author => Some(match self.get_user(&author_id)? {
                Some(user) => Reference::Populated(user),
                None => Reference::Id(author_id),
            }),
            Some(author_id) => Some(Reference::Id(author_id)),
            None => None,
        };

        let comments = if populate.comments {
            self.comments_for(&row.id)?
                .into_iter()
                .map(Reference::Populated)
                .collect()
        } else {
            self.comment_ids_for(&row.id)?
                .into_iter()
                .map(Reference::Id)
                .collect()
        };

        Ok(Discussion {
            id: row.id,
            title: row.title,
            description: row.description,
            author,
            category: row.category,
            tags,
            views: row.views.max(0) as u64,
            comments,
            created_at: from_ms(row.created_at),
            updated_at: from_ms(row.updated_at),
        })
    }
}

fn row_to_discussion(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiscussionRow> {
    Ok(DiscussionRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        author_id: row.get(3)?,
        category: row.get(4)?,
        tags: row.get(5)?,
        views: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Schema rules the store enforces on create.
fn check_schema(params: &DiscussionParams) -> StoreResult<()> {
    let mut problems = Vec::new();

    if params.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
        problems.push("title is required".to_string());
    }
    if params
        .description
        .as_deref()
        .is_none_or(|d| d.trim().is_empty())
    {
        problems.push("description is required".to_string());
    }
    if let Some(category) = &params.category {
        if !CATEGORIES.contains(&category.as_str()) {
            problems.push(format!("`{category}` is not a valid category"));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Schema(problems.join(", ")))
    }
}

fn check_id(id: &str) -> StoreResult<()> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| StoreError::InvalidId(id.to_string()))
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn from_ms(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Shared handle to one SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<SqliteDb>>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = SqliteDb::open(path)?;
        info!("Opened discussion store at {}", path.display());
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let db = SqliteDb::open_in_memory()?;
        info!("Opened in-memory discussion store");
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    async fn with_db<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&SqliteDb) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let db = db.lock();
            f(&db)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

impl Store for SqliteStore {
    async fn create(&self, params: DiscussionParams) -> StoreResult<Discussion> {
        let discussion = self
            .with_db(move |db| {
                let id = db.insert_discussion(&params)?;
                db.load_discussion(&id, Populate::NONE)?
                    .ok_or(StoreError::NotFound(id))
            })
            .await?;
        debug!("Created discussion {}", discussion.id);
        Ok(discussion)
    }

    async fn find_all(&self, populate: Populate) -> StoreResult<Vec<Discussion>> {
        self.with_db(move |db| db.list_discussions(populate)).await
    }

    async fn find_by_id(&self, id: &str, populate: Populate) -> StoreResult<Discussion> {
        check_id(id)?;
        let id = id.to_string();
        self.with_db(move |db| {
            db.load_discussion(&id, populate)?
                .ok_or(StoreError::NotFound(id))
        })
        .await
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        params: DiscussionParams,
        populate: Populate,
    ) -> StoreResult<Discussion> {
        check_id(id)?;
        let id = id.to_string();
        let discussion = self
            .with_db(move |db| {
                if !db.update_discussion(&id, &params)? {
                    return Err(StoreError::NotFound(id));
                }
                db.load_discussion(&id, populate)?
                    .ok_or(StoreError::NotFound(id))
            })
            .await?;
        debug!("Updated discussion {}", discussion.id);
        Ok(discussion)
    }

    async fn find_by_id_and_remove(&self, id: &str) -> StoreResult<Option<Discussion>> {
        check_id(id)?;
        let id = id.to_string();
        let removed = self.with_db(move |db| db.delete_discussion(&id)).await?;
        if let Some(discussion) = &removed {
            debug!("Removed discussion {}", discussion.id);
        }
        Ok(removed)
    }

    async fn save_views(&self, id: &str, views: u64) -> StoreResult<()> {
        check_id(id)?;
        let id = id.to_string();
        self.with_db(move |db| {
            if db.set_views(&id, views)? {
                Ok(())
            } else {
                Err(StoreError::NotFound(id))
            }
        })
        .await
    }

    async fn create_user(&self, name: &str, email: &str) -> StoreResult<User> {
        let name = name.to_string();
        let email = email.to_string();
        self.with_db(move |db| db.insert_user(&name, &email)).await
    }

    async fn add_comment(
        &self,
        discussion_id: &str,
        author_id: Option<&str>,
        content: &str,
    ) -> StoreResult<Comment> {
        check_id(discussion_id)?;
        let discussion_id = discussion_id.to_string();
        let author_id = author_id.map(str::to_string);
        let content = content.to_string();
        self.with_db(move |db| db.insert_comment(&discussion_id, author_id.as_deref(), &content))
            .await
    }
}
