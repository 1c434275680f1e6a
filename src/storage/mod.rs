//! Storage Layer
//!
//! Persistence of motorcycle plate records using SQLite.

pub mod database;
pub mod record;

pub use database::SqliteRecordStore;
pub use record::{MotorcycleRecord, NewRecord, StatusFlag};

use anyhow::Result;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`RecordStore`]
///
/// `DuplicateKey`, `NotFound` and `InvalidPlate` are business rejections and
/// leave the store untouched. `Unavailable` means the database itself failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a motorcycle with plate number '{plate}' already exists")]
    DuplicateKey { plate: String },

    #[error("no motorcycle found with plate number '{plate}'")]
    NotFound { plate: String },

    #[error("plate number must not be empty")]
    InvalidPlate,

    #[error("invalid table name '{name}'")]
    InvalidTable { name: String },

    #[error("record store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}

impl StoreError {
    /// Whether this is a well-defined business outcome rather than an
    /// infrastructure failure
    pub fn is_rejection(&self) -> bool {
        match self {
            StoreError::DuplicateKey { .. } | StoreError::NotFound { .. } | StoreError::InvalidPlate => {
                true
            }
            StoreError::InvalidTable { .. } | StoreError::Unavailable(_) => false,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Uniqueness-enforcing storage for motorcycle records, keyed by plate number
pub trait RecordStore: Send + Sync {
    /// Persist a new record. Fails with `DuplicateKey` if the plate exists.
    fn insert(&self, record: &NewRecord) -> StoreResult<()>;

    /// Set one status flag to true
    fn set_flag(&self, plate_number: &str, flag: StatusFlag) -> StoreResult<()>;

    /// Reset all three status flags to false in a single write
    fn clear_all_flags(&self, plate_number: &str) -> StoreResult<()>;

    /// Point lookup by plate number
    fn find(&self, plate_number: &str) -> StoreResult<Option<MotorcycleRecord>>;

    /// Permanently remove a record
    fn delete(&self, plate_number: &str) -> StoreResult<()>;

    /// Number of stored records
    fn count(&self) -> StoreResult<u64>;
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("ph", "plateledger", "PlateLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Get the application data directory
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = project_dirs()?.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = project_dirs()?.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}
