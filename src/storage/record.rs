//! Motorcycle record definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stored motorcycle registration and its status flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorcycleRecord {
    /// Unique plate number (primary key)
    pub plate_number: String,
    /// Region the motorcycle is registered in
    pub region: String,
    /// Plate is blacklisted
    pub blacklisted: bool,
    /// Registration has expired
    pub expired: bool,
    /// Motorcycle has a violation history
    pub violations: bool,
}

impl MotorcycleRecord {
    /// Value of a single status flag
    pub fn flag(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Blacklisted => self.blacklisted,
            StatusFlag::Expired => self.expired,
            StatusFlag::Violations => self.violations,
        }
    }

    /// Whether any status flag is set
    pub fn any_flag(&self) -> bool {
        StatusFlag::ALL.iter().any(|f| self.flag(*f))
    }
}

/// Fields for creating a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub plate_number: String,
    pub region: String,
    pub blacklisted: bool,
    pub expired: bool,
    pub violations: bool,
}

impl NewRecord {
    /// A record with all flags cleared
    pub fn new(plate_number: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            plate_number: plate_number.into(),
            region: region.into(),
            blacklisted: false,
            expired: false,
            violations: false,
        }
    }

    /// Set an initial flag value
    pub fn with_flag(mut self, flag: StatusFlag, value: bool) -> Self {
        match flag {
            StatusFlag::Blacklisted => self.blacklisted = value,
            StatusFlag::Expired => self.expired = value,
            StatusFlag::Violations => self.violations = value,
        }
        self
    }
}

impl From<NewRecord> for MotorcycleRecord {
    fn from(new: NewRecord) -> Self {
        Self {
            plate_number: new.plate_number,
            region: new.region,
            blacklisted: new.blacklisted,
            expired: new.expired,
            violations: new.violations,
        }
    }
}

/// One of the three independent status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    Blacklisted,
    Expired,
    Violations,
}

impl StatusFlag {
    pub const ALL: [StatusFlag; 3] = [
        StatusFlag::Blacklisted,
        StatusFlag::Expired,
        StatusFlag::Violations,
    ];

    /// Column / field name
    pub fn column(&self) -> &'static str {
        match self {
            StatusFlag::Blacklisted => "blacklisted",
            StatusFlag::Expired => "expired",
            StatusFlag::Violations => "violations",
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for StatusFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blacklisted" => Ok(StatusFlag::Blacklisted),
            "expired" => Ok(StatusFlag::Expired),
            "violations" => Ok(StatusFlag::Violations),
            other => Err(format!(
                "unknown flag '{}', expected one of: blacklisted, expired, violations",
                other
            )),
        }
    }
}
