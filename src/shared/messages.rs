//! User-facing outcome of each plate action

use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::storage::{MotorcycleRecord, StatusFlag, StoreError, StoreResult};

/// What happened when the user triggered an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Inserted { plate: String, region: String },
    Duplicate { plate: String },
    FlagSet { plate: String, flag: StatusFlag },
    Cleared { plate: String },
    Deleted { plate: String },
    Found { record: MotorcycleRecord },
    Absent { plate: String },
    NotFound { plate: String },
    InvalidPlate,
    /// The store itself failed
    Failed { message: String },
}

impl ActionOutcome {
    /// Map a store result, turning business rejections into outcomes
    pub fn from_result(result: StoreResult<()>, on_success: ActionOutcome) -> Self {
        match result {
            Ok(()) => on_success,
            Err(StoreError::DuplicateKey { plate }) => ActionOutcome::Duplicate { plate },
            Err(StoreError::NotFound { plate }) => ActionOutcome::NotFound { plate },
            Err(StoreError::InvalidPlate) => ActionOutcome::InvalidPlate,
            Err(e @ (StoreError::InvalidTable { .. } | StoreError::Unavailable(_))) => {
                debug_assert!(!e.is_rejection());
                error!("Record store failure: {}", e);
                ActionOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Infrastructure failure rather than a normal outcome
    pub fn is_failure(&self) -> bool {
        matches!(self, ActionOutcome::Failed { .. })
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Inserted { plate, region } => {
                write!(f, "Added plate {} ({}).", plate, region)
            }
            ActionOutcome::Duplicate { plate } => {
                write!(f, "Plate {} already exists in DB.", plate)
            }
            ActionOutcome::FlagSet { plate, flag } => {
                write!(f, "Plate {} marked {}.", plate, flag)
            }
            ActionOutcome::Cleared { plate } => {
                write!(f, "Cleared all statuses for plate {}.", plate)
            }
            ActionOutcome::Deleted { plate } => write!(f, "Deleted plate {}.", plate),
            ActionOutcome::Found { record } => {
                write!(f, "{} ({}): ", record.plate_number, record.region)?;
                if !record.any_flag() {
                    return f.write_str("no flags");
                }
                let set: Vec<&str> = StatusFlag::ALL
                    .iter()
                    .filter(|flag| record.flag(**flag))
                    .map(|flag| flag.column())
                    .collect();
                f.write_str(&set.join(", "))
            }
            ActionOutcome::Absent { plate } => write!(f, "Plate {} not in DB.", plate),
            ActionOutcome::NotFound { plate } => write!(f, "Plate {} not in DB.", plate),
            ActionOutcome::InvalidPlate => f.write_str("No plate number given."),
            ActionOutcome::Failed { message } => write!(f, "Database error: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_through() {
        let outcome = ActionOutcome::from_result(
            Ok(()),
            ActionOutcome::Deleted { plate: "PH1234".into() },
        );
        assert_eq!(outcome, ActionOutcome::Deleted { plate: "PH1234".into() });
    }

    #[test]
    fn test_rejections_map_to_outcomes() {
        let outcome = ActionOutcome::from_result(
            Err(StoreError::DuplicateKey { plate: "PH1234".into() }),
            ActionOutcome::InvalidPlate,
        );
        assert_eq!(outcome, ActionOutcome::Duplicate { plate: "PH1234".into() });
        assert!(!outcome.is_failure());

        let outcome = ActionOutcome::from_result(
            Err(StoreError::NotFound { plate: "FAKE999".into() }),
            ActionOutcome::InvalidPlate,
        );
        assert_eq!(outcome.to_string(), "Plate FAKE999 not in DB.");

        let outcome = ActionOutcome::from_result(
            Err(StoreError::InvalidPlate),
            ActionOutcome::Cleared { plate: "".into() },
        );
        assert_eq!(outcome, ActionOutcome::InvalidPlate);
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_store_failure_is_not_a_rejection() {
        let outcome = ActionOutcome::from_result(
            Err(StoreError::from(rusqlite::Error::InvalidQuery)),
            ActionOutcome::Cleared { plate: "PH1234".into() },
        );
        assert!(outcome.is_failure());
        assert!(outcome.to_string().starts_with("Database error"));
    }

    #[test]
    fn test_found_display_lists_set_flags() {
        let record = MotorcycleRecord {
            plate_number: "NIJ1234".into(),
            region: "Metro Manila".into(),
            blacklisted: true,
            expired: false,
            violations: true,
        };
        let outcome = ActionOutcome::Found { record: record.clone() };
        assert_eq!(outcome.to_string(), "NIJ1234 (Metro Manila): blacklisted, violations");

        let clean = ActionOutcome::Found {
            record: MotorcycleRecord {
                blacklisted: false,
                violations: false,
                ..record
            },
        };
        assert_eq!(clean.to_string(), "NIJ1234 (Metro Manila): no flags");
    }

    #[test]
    fn test_json_tagging() {
        let outcome = ActionOutcome::FlagSet {
            plate: "NIJ1234".into(),
            flag: StatusFlag::Blacklisted,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["outcome"], "flag_set");
        assert_eq!(value["flag"], "blacklisted");
    }
}
