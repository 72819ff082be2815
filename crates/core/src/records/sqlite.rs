//! SQLite-backed record store implementation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info, warn};

use super::{Record, RecordStore, RecordStoreError};

/// SQLite-backed record store.
///
/// The connection is opened lazily: if the database cannot be opened at
/// startup, every query retries until it succeeds.
pub struct SqliteRecordStore {
    path: Option<PathBuf>,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteRecordStore {
    /// Open a record store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, RecordStoreError> {
        let conn = Self::open(Some(path))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Create an in-memory record store (useful for testing).
    pub fn in_memory() -> Result<Self, RecordStoreError> {
        let conn = Self::open(None)?;
        Ok(Self {
            path: None,
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Try to open the store; on failure, log and defer the connection to the first query.
    ///
    /// `None` means in-memory.
    pub fn connect_lazy(path: Option<&Path>) -> Self {
        let conn = match Self::open(path) {
            Ok(conn) => {
                info!(path = ?path, "Record store connected");
                Some(conn)
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Record store unavailable, will retry on demand");
                None
            }
        };

        Self {
            path: path.map(Path::to_path_buf),
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn open(path: Option<&Path>) -> Result<Connection, RecordStoreError> {
        let conn = match path {
            Some(path) => Connection::open(path),
            None => Connection::open_in_memory(),
        }
        .map_err(|e| RecordStoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(conn)
    }

    fn initialize_schema(conn: &Connection) -> Result<(), RecordStoreError> {
        conn.execute_batch(
            r#"
            -- Indexed content (one row per unique identifier)
            CREATE TABLE IF NOT EXISTS records (
                identifier TEXT PRIMARY KEY,
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL,
                display_name TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_completed ON records(completed);
            "#,
        )
        .map_err(|e| RecordStoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Insert a new record. The identifier is stored lowercase.
    ///
    /// Records are normally written by the ingestion side; this exists for
    /// tooling and tests that share the database.
    pub async fn insert(&self, record: &Record) -> Result<(), RecordStoreError> {
        let record = record.clone();
        self.with_conn(move |conn| {
            let identifier = record.identifier.to_lowercase();
            conn.execute(
                "INSERT INTO records (identifier, file_name, file_path, display_name, completed, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    &identifier,
                    &record.file_name,
                    &record.file_path,
                    &record.display_name,
                    record.completed,
                    record.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    RecordStoreError::Duplicate(identifier.clone())
                }
                other => RecordStoreError::Database(other.to_string()),
            })?;
            Ok(())
        })
        .await
    }

    /// Run a closure against the connection on the blocking pool, reconnecting if needed.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, RecordStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, RecordStoreError> + Send + 'static,
    {
        let slot = Arc::clone(&self.conn);
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = slot
                .lock()
                .map_err(|_| RecordStoreError::Internal("connection lock poisoned".to_string()))?;

            if guard.is_none() {
                let conn = Self::open(path.as_deref())?;
                info!(path = ?path, "Record store reconnected");
                *guard = Some(conn);
            }

            match guard.as_ref() {
                Some(conn) => f(conn),
                None => Err(RecordStoreError::Internal(
                    "connection unavailable".to_string(),
                )),
            }
        })
        .await
        .map_err(|e| RecordStoreError::Internal(e.to_string()))?
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        let created_at_str: String = row.get(5)?;
        let created_at = parse_timestamp(&created_at_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
        })?;

        Ok(Record {
            identifier: row.get(0)?,
            file_name: row.get(1)?,
            file_path: row.get(2)?,
            display_name: row.get(3)?,
            completed: row.get(4)?,
            created_at,
        })
    }
}

/// Accepts RFC 3339 and SQLite's `CURRENT_TIMESTAMP` form (UTC).
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn find_completed(&self, identifier: &str) -> Result<Option<Record>, RecordStoreError> {
        let identifier = identifier.to_lowercase();
        self.with_conn(move |conn| {
            let record = conn
                .query_row(
                    "SELECT identifier, file_name, file_path, display_name, completed, created_at
                     FROM records WHERE identifier = ? AND completed = 1",
                    params![&identifier],
                    Self::row_to_record,
                )
                .optional()
                .map_err(|e| RecordStoreError::Database(e.to_string()))?;

            debug!(identifier = %identifier, found = record.is_some(), "Record lookup");
            Ok(record)
        })
        .await
    }

    async fn list_completed(&self) -> Result<Vec<Record>, RecordStoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT identifier, file_name, file_path, display_name, completed, created_at
                     FROM records WHERE completed = 1 ORDER BY rowid",
                )
                .map_err(|e| RecordStoreError::Database(e.to_string()))?;

            let rows = stmt
                .query_map([], Self::row_to_record)
                .map_err(|e| RecordStoreError::Database(e.to_string()))?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row.map_err(|e| RecordStoreError::Database(e.to_string()))?);
            }
            Ok(records)
        })
        .await
    }
}
