//! Plate field extraction
//!
//! Assigns plate-number and region roles to OCR fragments by vertical
//! position: the topmost fragment is the plate number, the next one is the
//! region.

use serde::Serialize;

use super::{OcrFragment, Point};

/// Fields read off a plate image
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlateFields {
    /// Text of the topmost fragment, trimmed; empty if there were none
    pub plate_number: String,
    /// Text of the second fragment, trimmed; empty if there were fewer than two
    pub region: String,
    /// Every fragment location, top to bottom
    pub locations: Vec<Vec<Point>>,
}

impl PlateFields {
    /// No text was recognized at all
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Sort fragments top to bottom and pick plate number and region
///
/// Fragments sharing a vertical coordinate keep the provider's order, which
/// callers should treat as unspecified.
pub fn extract_plate_fields(mut fragments: Vec<OcrFragment>) -> PlateFields {
    fragments.sort_by(|a, b| a.top().total_cmp(&b.top()));

    let mut texts = fragments.iter().map(|f| f.text.trim().to_string());
    let plate_number = texts.next().unwrap_or_default();
    let region = texts.next().unwrap_or_default();

    PlateFields {
        plate_number,
        region,
        locations: fragments.into_iter().map(|f| f.location).collect(),
    }
}
