/*!
 * Database connection management.
 *
 * This module handles SQLite database connection creation and
 * initialization, and provides serialized access to the connection.
 */

use anyhow::{Context, anyhow};
use log::{debug, info};
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};
use std::time::Duration;

use super::schema;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "translations.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "translatable";

/// Path marker for in-memory databases
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Default time a writer waits for a lock held by another connection
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Something that can run a closure against a SQLite connection.
///
/// Store operations are written against this trait so the same code runs
/// on a shared `DatabaseConnection` and inside an open transaction.
pub trait Executor {
    /// Run `f` with access to the connection
    fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<anyhow::Error>;
}

impl Executor for &Connection {
    fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<anyhow::Error>,
    {
        f(*self)
    }
}

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Translations table this connection was initialized for
    table: Arc<str>,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
    /// Thread currently holding `connection`
    holder: Arc<parking_lot::Mutex<Option<ThreadId>>>,
}

/// Locked connection that forgets its holding thread on drop
struct HeldConnection<'a> {
    guard: MutexGuard<'a, Connection>,
    holder: &'a parking_lot::Mutex<Option<ThreadId>>,
}

impl Deref for HeldConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.guard
    }
}

impl DerefMut for HeldConnection<'_> {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.guard
    }
}

impl Drop for HeldConnection<'_> {
    fn drop(&mut self) {
        // Cleared before the guard field releases the mutex
        *self.holder.lock() = None;
    }
}

impl std::fmt::Debug for DatabaseConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConnection")
            .field("db_path", &self.db_path)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl DatabaseConnection {
    /// Create a new database connection at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> anyhow::Result<Self> {
        Self::open(db_path, schema::DEFAULT_TABLE_NAME, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open a database file for the given table with a custom busy timeout
    pub fn open<P: AsRef<Path>>(
        db_path: P,
        table: &str,
        busy_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if db_path.as_os_str() == IN_MEMORY_PATH {
            return Self::in_memory_for(table);
        }

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        conn.busy_timeout(busy_timeout)
            .context("Failed to set busy timeout")?;

        // WAL lets readers proceed while another connection writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        schema::initialize_schema(&conn, table)?;

        Ok(Self::wrap(db_path, table, conn))
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> anyhow::Result<Self> {
        Self::in_memory_for(schema::DEFAULT_TABLE_NAME)
    }

    fn in_memory_for(table: &str) -> anyhow::Result<Self> {
        debug!("Creating in-memory database");

        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;

        schema::initialize_schema(&conn, table)?;

        Ok(Self::wrap(PathBuf::from(IN_MEMORY_PATH), table, conn))
    }

    fn wrap(db_path: PathBuf, table: &str, conn: Connection) -> Self {
        Self {
            db_path,
            table: Arc::from(table),
            connection: Arc::new(Mutex::new(conn)),
            holder: Arc::new(parking_lot::Mutex::new(None)),
        }
    }

    /// Lock the connection for the current thread
    ///
    /// Fails instead of blocking when this thread already holds the lock,
    /// e.g. a store call made from inside `transaction`.
    fn lock(&self) -> anyhow::Result<HeldConnection<'_>> {
        let current = thread::current().id();
        if *self.holder.lock() == Some(current) {
            return Err(anyhow!(
                "Database connection is already locked by this thread (nested call inside a transaction)"
            ));
        }

        let guard = self
            .connection
            .lock()
            .map_err(|e| anyhow!("Failed to acquire database lock: {}", e))?;
        *self.holder.lock() = Some(current);

        Ok(HeldConnection {
            guard,
            holder: &self.holder,
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> anyhow::Result<PathBuf> {
        // Try to use the system data directory
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Name of the translations table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether this connection points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_PATH
    }

    /// Execute a database operation with the connection
    ///
    /// This method acquires the mutex lock and executes the provided closure
    /// with access to the connection.
    pub fn execute<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<anyhow::Error>,
    {
        let conn = self.lock()?;

        f(&conn)
    }

    /// Begin a transaction and execute operations within it
    ///
    /// The transaction commits when `f` succeeds and rolls back when it
    /// returns an error.
    pub fn transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, E>,
        E: From<anyhow::Error> + From<rusqlite::Error>,
    {
        let mut conn = self.lock()?;

        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;

        Ok(result)
    }

    /// Get database statistics
    pub fn stats(&self) -> anyhow::Result<DatabaseStats> {
        self.execute(|conn| {
            let translation_count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", self.table),
                [],
                |row| row.get(0),
            )?;

            let owner_count: i64 = conn.query_row(
                &format!(
                    "SELECT COUNT(*) FROM (SELECT DISTINCT model, model_id FROM {})",
                    self.table
                ),
                [],
                |row| row.get(0),
            )?;

            let file_size = if self.is_in_memory() {
                0
            } else {
                std::fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0)
            };

            Ok::<_, anyhow::Error>(DatabaseStats {
                translation_count,
                owner_count,
                file_size_bytes: file_size,
            })
        })
    }
}

impl Executor for DatabaseConnection {
    fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<anyhow::Error>,
    {
        self.execute(f)
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    /// Number of stored translations
    pub translation_count: i64,
    /// Number of distinct owners with at least one translation
    pub owner_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Translations: {}, Owners: {}, Size: {} KB",
            self.translation_count,
            self.owner_count,
            self.file_size_bytes / 1024
        )
    }
}
