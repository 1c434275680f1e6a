//! SQLite database for persistent storage

use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{MotorcycleRecord, NewRecord, RecordStore, StatusFlag, StoreError, StoreResult};
use crate::config::DatabaseConfig;

/// Record store backed by a single SQLite table
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteRecordStore {
    /// Open or create database at path
    pub fn open(path: &Path, config: &DatabaseConfig) -> StoreResult<Self> {
        validate_table_name(&config.table)?;
        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn, config)?;
        info!("Opened record store at {:?} (table {})", path, store.table());
        Ok(store)
    }

    /// Open a private in-memory database
    #[cfg(test)]
    pub fn open_in_memory(config: &DatabaseConfig) -> StoreResult<Self> {
        validate_table_name(&config.table)?;
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, config)
    }

    fn with_connection(conn: Connection, config: &DatabaseConfig) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

        let store = Self {
            conn: Mutex::new(conn),
            table: config.table.clone(),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    ///
    /// The primary key on `plate_number` is the uniqueness guarantee; inserts
    /// never check for an existing row first.
    fn init_schema(&self) -> StoreResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                plate_number TEXT NOT NULL PRIMARY KEY,
                region       TEXT NOT NULL,
                blacklisted  INTEGER NOT NULL DEFAULT 0,
                expired      INTEGER NOT NULL DEFAULT 0,
                violations   INTEGER NOT NULL DEFAULT 0
            )",
            self.table
        );
        self.conn.lock().execute_batch(&sql)?;
        debug!("Schema ensured for table '{}'", self.table);
        Ok(())
    }

    /// Name of the backing table
    pub fn table(&self) -> &str {
        &self.table
    }

    fn expect_match(changed: usize, plate_number: &str) -> StoreResult<()> {
        if changed == 0 {
            return Err(StoreError::NotFound {
                plate: plate_number.to_string(),
            });
        }
        Ok(())
    }
}

impl RecordStore for SqliteRecordStore {
    fn insert(&self, record: &NewRecord) -> StoreResult<()> {
        if record.plate_number.trim().is_empty() {
            return Err(StoreError::InvalidPlate);
        }

        let sql = format!(
            "INSERT INTO {} (plate_number, region, blacklisted, expired, violations)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            self.table
        );
        let result = self.conn.lock().execute(
            &sql,
            params![
                record.plate_number,
                record.region,
                record.blacklisted,
                record.expired,
                record.violations
            ],
        );

        match result {
            Ok(_) => {
                info!(
                    "Inserted motorcycle with plate {} in region {}",
                    record.plate_number, record.region
                );
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => {
                warn!("Plate {} already exists", record.plate_number);
                Err(StoreError::DuplicateKey {
                    plate: record.plate_number.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_flag(&self, plate_number: &str, flag: StatusFlag) -> StoreResult<()> {
        // Column names come from StatusFlag, never from caller input
        let sql = format!(
            "UPDATE {} SET {} = 1 WHERE plate_number = ?1",
            self.table,
            flag.column()
        );
        let changed = self.conn.lock().execute(&sql, params![plate_number])?;
        Self::expect_match(changed, plate_number)?;

        info!("Set '{}' for plate {}", flag, plate_number);
        Ok(())
    }

    fn clear_all_flags(&self, plate_number: &str) -> StoreResult<()> {
        let sql = format!(
            "UPDATE {} SET blacklisted = 0, expired = 0, violations = 0 WHERE plate_number = ?1",
            self.table
        );
        let changed = self.conn.lock().execute(&sql, params![plate_number])?;
        Self::expect_match(changed, plate_number)?;

        info!("Cleared all statuses for plate {}", plate_number);
        Ok(())
    }

    fn find(&self, plate_number: &str) -> StoreResult<Option<MotorcycleRecord>> {
        let sql = format!(
            "SELECT plate_number, region, blacklisted, expired, violations
             FROM {} WHERE plate_number = ?1",
            self.table
        );
        let record = self
            .conn
            .lock()
            .query_row(&sql, params![plate_number], |row| {
                Ok(MotorcycleRecord {
                    plate_number: row.get(0)?,
                    region: row.get(1)?,
                    blacklisted: row.get(2)?,
                    expired: row.get(3)?,
                    violations: row.get(4)?,
                })
            })
            .optional()?;

        debug!("Lookup {} -> {}", plate_number, if record.is_some() { "found" } else { "absent" });
        Ok(record)
    }

    fn delete(&self, plate_number: &str) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE plate_number = ?1", self.table);
        let changed = self.conn.lock().execute(&sql, params![plate_number])?;
        Self::expect_match(changed, plate_number)?;

        info!("Deleted motorcycle with plate {}", plate_number);
        Ok(())
    }

    fn count(&self) -> StoreResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = self.conn.lock().query_row(&sql, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass
fn validate_table_name(name: &str) -> StoreResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTable {
            name: name.to_string(),
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
        }
        _ => false,
    }
}
