//! SQLite-backed alias store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{Connection, ErrorCode, OptionalExtension, params};

use crate::domain::{AliasRecord, PoolCode, StationKey};

use super::AliasStore;
use super::error::StoreError;

/// Default busy timeout for the connection.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS station_alias(
        pool_code INTEGER NOT NULL,
        name TEXT NOT NULL,
        alias TEXT NOT NULL,
        PRIMARY KEY (pool_code, name)
    );
";

/// Configuration for the SQLite store.
#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long a statement waits on a locked database.
    pub busy_timeout: Duration,
}

impl SqliteStoreConfig {
    /// Create a config for the given file with the default busy timeout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Alias store persisted in a single SQLite table.
///
/// One connection, guarded by a mutex. Alias writes are rare administrative
/// actions so there is no pooling.
pub struct SqliteAliasStore {
    connection: Mutex<Connection>,
}

impl SqliteAliasStore {
    /// Open (or create) the database file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(config: &SqliteStoreConfig) -> Result<Self, StoreError> {
        ensure_parent_dir(&config.path)?;
        let connection = Connection::open(&config.path)?;
        connection.busy_timeout(config.busy_timeout)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory()?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Unavailable("connection mutex poisoned".to_string()))
    }
}

impl AliasStore for SqliteAliasStore {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        self.lock()?.execute_batch(CREATE_TABLE)?;
        Ok(())
    }

    fn scan_all(&self) -> Result<Vec<AliasRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT pool_code, name, alias FROM station_alias")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (pool_code, name, alias) = row?;
            records.push(record_from_row(pool_code, name, alias)?);
        }
        Ok(records)
    }

    fn get_one(&self, key: &StationKey) -> Result<Option<AliasRecord>, StoreError> {
        let conn = self.lock()?;
        let alias: Option<String> = conn
            .query_row(
                "SELECT alias FROM station_alias WHERE pool_code = ?1 AND name = ?2",
                params![key.pool_code(), key.station_name()],
                |row| row.get(0),
            )
            .optional()?;

        alias
            .map(|alias| {
                AliasRecord::new(key.clone(), alias)
                    .map_err(|e| StoreError::Corrupt(format!("{key}: {e}")))
            })
            .transpose()
    }

    fn insert_one(&self, record: &AliasRecord) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let result = conn.execute(
            "INSERT INTO station_alias (pool_code, name, alias) VALUES (?1, ?2, ?3)",
            params![
                record.key.pool_code(),
                record.key.station_name(),
                record.alias
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateRow(record.key.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_one(&self, key: &StationKey, alias: &str) -> Result<(), StoreError> {
        let changed = self.lock()?.execute(
            "UPDATE station_alias SET alias = ?1 WHERE pool_code = ?2 AND name = ?3",
            params![alias, key.pool_code(), key.station_name()],
        )?;
        if changed == 0 {
            return Err(StoreError::MissingRow(key.to_string()));
        }
        Ok(())
    }

    fn delete_one(&self, key: &StationKey) -> Result<(), StoreError> {
        let changed = self.lock()?.execute(
            "DELETE FROM station_alias WHERE pool_code = ?1 AND name = ?2",
            params![key.pool_code(), key.station_name()],
        )?;
        if changed == 0 {
            return Err(StoreError::MissingRow(key.to_string()));
        }
        Ok(())
    }
}

/// Build a record from raw column values, rejecting rows the domain can't represent.
fn record_from_row(pool_code: i64, name: String, alias: String) -> Result<AliasRecord, StoreError> {
    let pool_code = PoolCode::try_from(pool_code)
        .map_err(|_| StoreError::Corrupt(format!("pool code {pool_code} out of range")))?;
    let key = StationKey::new(pool_code, name)
        .map_err(|e| StoreError::Corrupt(format!("pool {pool_code}: {e}")))?;
    AliasRecord::new(key, alias).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            StoreError::Unavailable(format!("failed to create database directory: {e}"))
        })?;
    }
    Ok(())
}
