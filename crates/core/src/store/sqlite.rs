// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed transactional store.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{Backend, DurableStore};
use crate::action::{timestamp_from_ms, Action, ActionId, ActionKind, NewAction};
use crate::error::{Error, Result};

/// SQL schema for the action queue.
///
/// AUTOINCREMENT keeps ids strictly increasing and never reused, even after
/// the table has been emptied.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS queue (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL,
    payload TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
"#;

/// How long a writer waits for another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Transactional store on a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path` and applies the schema.
    ///
    /// Every failure is reported as [`Error::StoreUnavailable`] so the caller
    /// can select the fallback store.
    pub fn open(path: &Path) -> Result<Self> {
        Self::try_open(path).map_err(|e| {
            Error::StoreUnavailable(format!("{}: {e}", path.display()))
        })
    }

    fn try_open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::init(conn)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn })
    }

    fn row_to_action(row: &rusqlite::Row<'_>) -> rusqlite::Result<Action> {
        let id: i64 = row.get(0)?;
        let kind_str: String = row.get(1)?;
        let payload_str: String = row.get(2)?;
        let created_ms: i64 = row.get(3)?;

        let kind: ActionKind = parse_db(&kind_str, "type")?;
        let payload = serde_json::from_str(&payload_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Action {
            id: ActionId::new(id),
            kind,
            payload,
            created_at: timestamp_from_ms(u64::try_from(created_ms).unwrap_or(0)),
        })
    }
}

impl DurableStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Transactional
    }

    fn append(&mut self, action: &NewAction, created_at: DateTime<Utc>) -> Result<Action> {
        let payload = serde_json::to_string(&action.payload)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO queue (type, payload, created_at) VALUES (?1, ?2, ?3)",
            params![action.kind.as_str(), payload, created_at.timestamp_millis()],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Action::from_new(ActionId::new(id), action, created_at))
    }

    fn list_all(&self) -> Result<Vec<Action>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, type, payload, created_at FROM queue ORDER BY id ASC")?;
        let actions = stmt
            .query_map([], Self::row_to_action)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(actions)
    }

    fn delete_by_id(&mut self, id: ActionId) -> Result<()> {
        self.conn
            .execute("DELETE FROM queue WHERE id = ?1", params![id.get()])?;
        Ok(())
    }

    fn clear(&mut self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM queue", [])?)
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
