//! Local persistence for drafts, wizard state, posts, quota and users.
//!
//! Everything lives in a single `SQLite` file under the storage root:
//!
//! ```text
//! <root>/state.sqlite
//!   kv       # Durable key-value strings (drafts, wizard state, session)
//!   posts    # Posts created through the local post service
//!   quota    # Single-row ledger of remaining free and paid posts
//!   users    # Registered accounts
//! ```

mod kv;
mod posts;
mod quota;
mod users;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;

pub use kv::{KeyValueStore, load_json, save_json};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS posts (
        id         TEXT PRIMARY KEY,
        kind       TEXT NOT NULL,
        record     TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS quota (
        id         INTEGER PRIMARY KEY CHECK (id = 1),
        free_posts INTEGER NOT NULL,
        paid_posts INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS users (
        email         TEXT PRIMARY KEY,
        first_name    TEXT NOT NULL,
        last_name     TEXT NOT NULL,
        password_salt TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at    TEXT NOT NULL
    );
";

/// Local `SQLite`-backed storage.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens the storage rooted at the given directory.
    ///
    /// The directory and the database schema are created if they don't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let conn = Connection::open(root.join("state.sqlite"))?;
        Self::with_connection(conn)
    }

    /// Opens a throwaway in-memory database.
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Returns the default storage root: `~/.tradepost/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tradepost"))
    }
}
