//! Per-plate view state
//!
//! Which actions make sense for a detected plate, given what the record
//! store holds for it.

use serde::Serialize;

use crate::storage::{MotorcycleRecord, StatusFlag};

/// Available actions for a detected plate, with a note for each disabled one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlateView {
    /// Plate the view was built for
    pub plate_number: String,
    /// Stored record, if any
    pub record: Option<MotorcycleRecord>,
    pub can_register: bool,
    pub can_blacklist: bool,
    pub can_expire: bool,
    pub can_flag_violations: bool,
    pub can_delete: bool,
    /// Status notes, in action order (register, blacklist, expire, violations, delete)
    pub notes: Vec<String>,
}

impl PlateView {
    /// Build the view from a store lookup
    pub fn from_lookup(plate_number: &str, record: Option<&MotorcycleRecord>) -> Self {
        let plate_number = plate_number.trim();
        if plate_number.is_empty() {
            return Self::default();
        }

        let mut view = Self {
            plate_number: plate_number.to_string(),
            record: record.cloned(),
            ..Self::default()
        };

        match record {
            Some(record) => {
                view.can_delete = true;
                view.notes.push("Plate already exists in DB.".to_string());

                for flag in StatusFlag::ALL {
                    let set = record.flag(flag);
                    match flag {
                        StatusFlag::Blacklisted => view.can_blacklist = !set,
                        StatusFlag::Expired => view.can_expire = !set,
                        StatusFlag::Violations => view.can_flag_violations = !set,
                    }
                    if set {
                        view.notes.push(already_set_note(flag).to_string());
                    }
                }
            }
            None => {
                view.can_register = true;
                view.notes.push("Plate not in DB.".to_string());
            }
        }

        view
    }

    /// Whether the flag action for `flag` is enabled
    pub fn can_set(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Blacklisted => self.can_blacklist,
            StatusFlag::Expired => self.can_expire,
            StatusFlag::Violations => self.can_flag_violations,
        }
    }
}

fn already_set_note(flag: StatusFlag) -> &'static str {
    match flag {
        StatusFlag::Blacklisted => "Already blacklisted.",
        StatusFlag::Expired => "Already expired.",
        StatusFlag::Violations => "Already has violations.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NewRecord;

    #[test]
    fn test_empty_plate_disables_everything() {
        let view = PlateView::from_lookup("  ", None);
        assert_eq!(view, PlateView::default());
        assert!(!view.can_register);
        assert!(!view.can_delete);
        assert!(view.notes.is_empty());
    }

    #[test]
    fn test_unknown_plate() {
        let view = PlateView::from_lookup("NIJ1234", None);
        assert!(view.can_register);
        assert!(!view.can_delete);
        for flag in StatusFlag::ALL {
            assert!(!view.can_set(flag));
        }
        assert_eq!(view.notes, vec!["Plate not in DB.".to_string()]);
    }

    #[test]
    fn test_stored_plate_without_flags() {
        let record = MotorcycleRecord::from(NewRecord::new("NIJ1234", "Metro Manila"));
        let view = PlateView::from_lookup("NIJ1234", Some(&record));
        assert!(!view.can_register);
        assert!(view.can_delete);
        for flag in StatusFlag::ALL {
            assert!(view.can_set(flag));
        }
        assert_eq!(view.notes, vec!["Plate already exists in DB.".to_string()]);
    }

    #[test]
    fn test_stored_plate_with_flags_set() {
        let record = MotorcycleRecord::from(
            NewRecord::new("PH5678", "Calabarzon")
                .with_flag(StatusFlag::Expired, true)
                .with_flag(StatusFlag::Violations, true),
        );
        let view = PlateView::from_lookup("PH5678", Some(&record));
        assert!(view.can_blacklist);
        assert!(!view.can_expire);
        assert!(!view.can_flag_violations);
        assert!(view.notes.contains(&"Already expired.".to_string()));
        assert!(view.notes.contains(&"Already has violations.".to_string()));
        assert!(!view.notes.contains(&"Already blacklisted.".to_string()));
    }
}
