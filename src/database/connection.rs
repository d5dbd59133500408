/*!
 * Database connection management.
 *
 * This module handles SQLite database connection creation, initialization,
 * and provides async-safe access patterns using tokio's spawn_blocking.
 * The handle is constructed explicitly by the caller and cloned into every
 * component that needs it; there is no process-wide instance.
 */

use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::schema;
use crate::errors::StorageError;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "wort_wirbel.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "wort-wirbel";

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for DatabaseConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConnection")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl DatabaseConnection {
    /// Open (or create) the database at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path)?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, StorageError> {
        debug!("Creating in-memory database");

        let conn = Connection::open_in_memory()?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> PathBuf {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .unwrap_or_else(|| PathBuf::from("."));

        base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a database operation with the connection
    ///
    /// The lock is held for the duration of `f` only. For async contexts,
    /// use `execute_async`.
    pub fn execute<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<StorageError>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

        f(&conn)
    }

    /// Execute a database operation asynchronously using spawn_blocking
    ///
    /// This is the preferred method for async contexts as it prevents
    /// blocking the async runtime.
    pub async fn execute_async<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StorageError> + Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || -> Result<T, E> {
            let conn = conn
                .lock()
                .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

            f(&conn)
        })
        .await
        .map_err(|e| StorageError::TaskFailed(e.to_string()))?
    }

    /// Begin an async transaction and execute operations within it
    ///
    /// The transaction is committed only when `f` succeeds; any error (or a
    /// panic) drops it, which rolls it back.
    pub async fn transaction_async<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StorageError> + Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || -> Result<T, E> {
            let mut conn = conn
                .lock()
                .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

            let tx = conn.transaction().map_err(StorageError::from)?;
            let result = f(&tx)?;
            tx.commit().map_err(StorageError::from)?;

            Ok(result)
        })
        .await
        .map_err(|e| StorageError::TaskFailed(e.to_string()))?
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DatabaseStats, StorageError> {
        self.execute(|conn| {
            let word_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;

            let language_count: i64 = conn.query_row(
                "SELECT COUNT(DISTINCT lang) FROM words",
                [],
                |row| row.get(0),
            )?;

            let retired_id_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM retired_word_ids", [], |row| row.get(0))?;

            let file_size = if self.db_path.to_string_lossy() != ":memory:" {
                std::fs::metadata(&self.db_path)
                    .map(|m| m.len())
                    .unwrap_or(0)
            } else {
                0
            };

            Ok(DatabaseStats {
                word_count,
                language_count,
                retired_id_count,
                file_size_bytes: file_size,
            })
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    /// Number of stored words
    pub word_count: i64,
    /// Number of distinct languages among stored words
    pub language_count: i64,
    /// Number of ids retired by deletion
    pub retired_id_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Words: {}, Languages: {}, Retired ids: {}, Size: {} KB",
            self.word_count,
            self.language_count,
            self.retired_id_count,
            self.file_size_bytes / 1024
        )
    }
}
