//! SQLite-backed template storage
//!
//! Templates live in a single `questions_tpl` table. Exactly one row is
//! expected to be unsealed (the active template); every sealed row is an
//! immutable historical version.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;
use tracing::debug;

use crate::core::record::{TemplateRecord, TemplateState};

/// Read access to persisted templates
pub trait TemplateStore: Send + Sync {
    /// Id and seal flag of every row
    fn template_states(&self) -> Result<Vec<TemplateState>, StoreError>;

    /// Full row by id, `None` if it does not exist
    fn get_by_id(&self, id: i64) -> Result<Option<TemplateRecord>, StoreError>;
}

/// Errors raised by template storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("template {0} does not exist")]
    Missing(i64),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Sqlite(err.to_string())
    }
}

const SELECT_COLUMNS: &str = "id, version, name, text, keywords, page_layout, is_sealed, \
     created_by, created_at, modified_by, modified_at";

/// Template store backed by a SQLite database
pub struct SqliteTemplateStore {
    conn: Mutex<Connection>,
}

impl SqliteTemplateStore {
    /// Open or create a store at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)?;
        // WAL lets readers proceed while a writer imports or seals
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        debug!(path = %path.display(), "opened template store");
        Self::with_connection(conn)
    }

    /// In-memory store, mostly for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.lock().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS questions_tpl (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                version TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL,
                text TEXT NOT NULL,
                keywords TEXT,
                page_layout TEXT,
                is_sealed INTEGER NOT NULL DEFAULT 0,
                created_by INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                modified_by INTEGER NOT NULL DEFAULT 0,
                modified_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_questions_tpl_sealed ON questions_tpl(is_sealed);
            "#,
        )?;
        Ok(())
    }

    /// Insert a record and return its new id (the record's own id is ignored)
    pub fn insert(&self, record: &TemplateRecord) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO questions_tpl (version, name, text, keywords, page_layout, is_sealed, \
             created_by, created_at, modified_by, modified_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.version,
                record.name,
                record.text,
                record.keywords,
                record.page_layout,
                record.is_sealed as i64,
                record.created_by,
                record.created_at.to_rfc3339(),
                record.modified_by,
                record.modified_at.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, name = %record.name, sealed = record.is_sealed, "inserted template");
        Ok(id)
    }

    /// Mark a template as sealed
    pub fn seal(&self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.lock().execute(
            "UPDATE questions_tpl SET is_sealed = 1, modified_at = ?2 WHERE id = ?1",
            params![id, Utc::now().to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(StoreError::Missing(id));
        }
        debug!(id, "sealed template");
        Ok(())
    }

    /// All rows ordered by id
    pub fn list(&self) -> Result<Vec<TemplateRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions_tpl ORDER BY id",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map([], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }
}

impl TemplateStore for SqliteTemplateStore {
    fn template_states(&self) -> Result<Vec<TemplateState>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, is_sealed FROM questions_tpl ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(TemplateState {
                id: row.get(0)?,
                is_sealed: row.get::<_, i64>(1)? != 0,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<TemplateRecord>, StoreError> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                &format!("SELECT {} FROM questions_tpl WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<TemplateRecord> {
    Ok(TemplateRecord {
        id: row.get(0)?,
        version: row.get(1)?,
        name: row.get(2)?,
        text: row.get(3)?,
        keywords: row.get(4)?,
        page_layout: row.get(5)?,
        is_sealed: row.get::<_, i64>(6)? != 0,
        created_by: row.get(7)?,
        created_at: parse_datetime(row.get::<_, String>(8)?),
        modified_by: row.get(9)?,
        modified_at: parse_datetime(row.get::<_, String>(10)?),
    })
}

/// Parse a stored RFC 3339 timestamp, falling back to a fixed epoch
fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
