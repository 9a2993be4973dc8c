//! # Database Layer
//!
//! SQLite-based persistence for the host directory.
//!
//! ## Database Location
//!
//! Database file: `%APPDATA%\ConnectX\connectx.db` (Windows)
//!
//! This keeps per-Windows-user isolation when running on a shared host or via
//! RemoteApp. Each user maintains their own independent host directory.
//!
//! ## Concurrency and Durability
//!
//! - **WAL Mode**: Write-Ahead Logging so readers don't block writers
//! - **FULL Sync**: `synchronous=FULL` keeps the directory durable on power loss
//! - **Schema Lock**: a static mutex serializes schema migration, with poison
//!   recovery and logging
//!
//! ## Schema
//!
//! - **`hosts`**: the directory itself
//!   - Primary key: `hostname` (full FQDN, stored case-sensitively)
//!   - Columns: `hostname`, `ip_address` (nullable), `description`
//! - **`meta`**: schema version record
//!
//! Credentials are NOT stored here; they live in the platform credential
//! store (see `src/platform/credman.rs`).

use crate::constants::{APP_NAME, DB_FILE_NAME};
use crate::core::{HostStore, SearchHosts};
use crate::models::Host;
use crate::utils::TransportError;
use async_trait::async_trait;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

const SCHEMA_VERSION: &str = "1";

#[derive(Debug, thiserror::Error)]
pub enum CxError {
    #[error("APPDATA environment variable not found")]
    MissingAppData,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<CxError> for TransportError {
    fn from(err: CxError) -> Self {
        TransportError::Backend(err.to_string())
    }
}

/// Returns %APPDATA%\ConnectX, creating it if needed.
pub fn get_appdata_dir() -> Result<PathBuf, CxError> {
    let app_data = std::env::var("APPDATA").map_err(|_| CxError::MissingAppData)?;
    let target = PathBuf::from(app_data).join(APP_NAME);
    fs::create_dir_all(&target)?;
    Ok(target)
}

/// Returns %APPDATA%\ConnectX\connectx.db.
pub fn get_db_path() -> Result<PathBuf, CxError> {
    Ok(get_appdata_dir()?.join(DB_FILE_NAME))
}

fn schema_lock() -> &'static Mutex<()> {
    static SCHEMA_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    SCHEMA_LOCK.get_or_init(|| Mutex::new(()))
}

fn open_connection(path: &Path) -> Result<Connection, CxError> {
    let conn = Connection::open(path)?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<(), CxError> {
    conn.busy_timeout(Duration::from_millis(5_000))?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "FULL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

/// Creates tables if missing and records the schema version in `meta`.
fn init_schema(conn: &Connection) -> Result<(), CxError> {
    let _guard = schema_lock().lock().unwrap_or_else(|p| {
        crate::logger::log_warn(
            "Recovered from poisoned mutex 'schema_lock' - previous thread panicked",
        );
        p.into_inner()
    });

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS hosts (
            hostname    TEXT PRIMARY KEY,
            ip_address  TEXT,
            description TEXT NOT NULL DEFAULT ''
        );
        ",
    )?;

    conn.execute(
        "INSERT INTO meta(key, value) VALUES('schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

/// SQLite-backed host store
///
/// Each operation opens its own connection; WAL mode plus the busy timeout
/// keep concurrent opens from failing. The schema is created eagerly when the
/// store is opened so later operations only see a valid database.
pub struct SqliteHostStore {
    path: PathBuf,
}

impl SqliteHostStore {
    /// Open (or create) the database at the per-user default location
    pub fn open_default() -> Result<Self, CxError> {
        Self::open(get_db_path()?)
    }

    /// Open (or create) a database at an explicit path
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CxError> {
        let path = path.into();
        let conn = open_connection(&path)?;
        init_schema(&conn)?;
        Ok(SqliteHostStore { path })
    }

    fn connection(&self) -> Result<Connection, CxError> {
        open_connection(&self.path)
    }

    fn list_sync(&self) -> Result<Vec<Host>, CxError> {
        let conn = self.connection()?;
        let mut stmt =
            conn.prepare("SELECT hostname, ip_address, description FROM hosts ORDER BY rowid")?;

        let rows = stmt.query_map([], |row| {
            Ok(Host {
                hostname: row.get(0)?,
                ip_address: row.get(1)?,
                description: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(CxError::from)
    }

    fn save_sync(&self, host: &Host) -> Result<(), CxError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO hosts(hostname, ip_address, description)
             VALUES(?1, ?2, ?3)
             ON CONFLICT(hostname) DO UPDATE SET
                 ip_address = excluded.ip_address,
                 description = excluded.description",
            (&host.hostname, &host.ip_address, &host.description),
        )?;
        Ok(())
    }

    fn delete_sync(&self, hostname: &str) -> Result<(), CxError> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM hosts WHERE hostname = ?1", [hostname])?;
        Ok(())
    }

    fn search_sync(&self, query: &str) -> Result<Vec<Host>, CxError> {
        let conn = self.connection()?;
        // Case-insensitive substring over every visible column; instr avoids
        // LIKE wildcard escaping.
        let mut stmt = conn.prepare(
            "SELECT hostname, ip_address, description FROM hosts
             WHERE instr(lower(hostname), lower(?1)) > 0
                OR instr(lower(description), lower(?1)) > 0
                OR instr(lower(coalesce(ip_address, '')), lower(?1)) > 0
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map([query], |row| {
            Ok(Host {
                hostname: row.get(0)?,
                ip_address: row.get(1)?,
                description: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(CxError::from)
    }
}

#[async_trait]
impl HostStore for SqliteHostStore {
    async fn list_hosts(&self) -> Result<Vec<Host>, TransportError> {
        // Delegate to the synchronous implementation (rusqlite is synchronous)
        self.list_sync().map_err(TransportError::from)
    }

    async fn save_host(&self, host: &Host) -> Result<(), TransportError> {
        self.save_sync(host).map_err(TransportError::from)
    }

    async fn delete_host(&self, hostname: &str) -> Result<(), TransportError> {
        self.delete_sync(hostname).map_err(TransportError::from)
    }
}

#[async_trait]
impl SearchHosts for SqliteHostStore {
    async fn search_hosts(&self, query: &str) -> Result<Vec<Host>, TransportError> {
        self.search_sync(query).map_err(TransportError::from)
    }
}
