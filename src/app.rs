//! Session Coordinator
//!
//! Owns the record store and configuration for one interactive session and
//! carries out the user's plate actions.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::shared::{ActionOutcome, PlateView};
use crate::storage::{self, NewRecord, RecordStore, SqliteRecordStore, StatusFlag, StoreResult};
use crate::vision::{extract_plate_fields, OcrProvider, PlateFields};

/// Result of scanning one plate image
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Fields read off the image
    pub fields: PlateFields,
    /// Actions available for the detected plate
    pub view: PlateView,
}

/// One interactive session against the record store
pub struct Session {
    store: Box<dyn RecordStore>,
    config: AppConfig,
}

impl Session {
    /// Open the configured record store
    pub fn open(config: AppConfig) -> Result<Self> {
        let path = match &config.database.path {
            Some(path) => path.clone(),
            None => config.database.resolve_path(&storage::get_data_dir()?),
        };

        let store = SqliteRecordStore::open(&path, &config.database)
            .with_context(|| format!("Failed to open record store at {:?}", path))?;

        Ok(Self::with_store(config, Box::new(store)))
    }

    /// Start a session over an already opened store
    pub fn with_store(config: AppConfig, store: Box<dyn RecordStore>) -> Self {
        match store.count() {
            Ok(count) => info!("Session started with {} stored plates", count),
            Err(e) => warn!("Could not count stored plates: {}", e),
        }
        Self { store, config }
    }

    /// Current configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Register a detected plate with all flags cleared
    pub fn register(&self, plate_number: &str, region: &str) -> ActionOutcome {
        self.insert(NewRecord::new(plate_number, region))
    }

    /// Insert a record with explicit initial flags
    ///
    /// Plate and region are trimmed; a blank region is stored as the
    /// configured default region.
    pub fn insert(&self, mut record: NewRecord) -> ActionOutcome {
        record.plate_number = record.plate_number.trim().to_string();
        record.region = match record.region.trim() {
            "" => self.config.general.default_region.clone(),
            region => region.to_string(),
        };

        let result = self.store.insert(&record);
        ActionOutcome::from_result(
            result,
            ActionOutcome::Inserted {
                plate: record.plate_number,
                region: record.region,
            },
        )
    }

    /// Set one status flag
    pub fn flag(&self, plate_number: &str, flag: StatusFlag) -> ActionOutcome {
        let plate = plate_number.trim();
        ActionOutcome::from_result(
            self.store.set_flag(plate, flag),
            ActionOutcome::FlagSet {
                plate: plate.to_string(),
                flag,
            },
        )
    }

    /// Clear every status flag
    pub fn clear(&self, plate_number: &str) -> ActionOutcome {
        let plate = plate_number.trim();
        ActionOutcome::from_result(
            self.store.clear_all_flags(plate),
            ActionOutcome::Cleared {
                plate: plate.to_string(),
            },
        )
    }

    /// Delete the plate's record
    pub fn remove(&self, plate_number: &str) -> ActionOutcome {
        let plate = plate_number.trim();
        ActionOutcome::from_result(
            self.store.delete(plate),
            ActionOutcome::Deleted {
                plate: plate.to_string(),
            },
        )
    }

    /// Look up the plate's record
    pub fn lookup(&self, plate_number: &str) -> ActionOutcome {
        let plate = plate_number.trim();
        match self.store.find(plate) {
            Ok(Some(record)) => ActionOutcome::Found { record },
            Ok(None) => ActionOutcome::Absent {
                plate: plate.to_string(),
            },
            Err(e) => {
                error!("Record store failure: {}", e);
                ActionOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Available actions for a plate
    pub fn view(&self, plate_number: &str) -> StoreResult<PlateView> {
        let plate = plate_number.trim();
        if plate.is_empty() {
            return Ok(PlateView::default());
        }
        let record = self.store.find(plate)?;
        Ok(PlateView::from_lookup(plate, record.as_ref()))
    }

    /// Recognize a plate image and report its stored status
    pub fn scan(&self, provider: &dyn OcrProvider, image_path: &Path) -> Result<ScanReport> {
        let fragments = provider
            .recognize(image_path)
            .with_context(|| format!("OCR failed for {:?}", image_path))?;

        let fields = extract_plate_fields(fragments);
        if fields.is_empty() {
            info!("No text found in {:?}", image_path);
        } else {
            info!(
                "Detected plate '{}' region '{}' in {:?}",
                fields.plate_number, fields.region, image_path
            );
        }

        let view = self.view(&fields.plate_number)?;
        Ok(ScanReport { fields, view })
    }

    /// End the session and release the store
    pub fn close(self) {
        drop(self.store);
        info!("Session closed");
    }
}
