//! Vision/OCR Layer
//!
//! Turns provider OCR output into plate fields. Recognition itself happens
//! in the cloud provider; this layer decodes its response and assigns the
//! plate-number and region roles.

pub mod huawei;
pub mod ocr;

pub use ocr::{extract_plate_fields, PlateFields};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from reading or decoding provider output
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to read OCR response {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed OCR response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("OCR provider error {code}: {message}")]
    Provider { code: String, message: String },
}

/// A point in image pixel coordinates
pub type Point = [f32; 2];

/// Unit of recognized text with its position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrFragment {
    /// Recognized text
    pub text: String,
    /// Quadrilateral, top-left point first
    pub location: Vec<Point>,
    /// Recognition confidence (0.0 - 1.0), if the provider reports one
    pub confidence: Option<f32>,
}

impl OcrFragment {
    pub fn new(text: impl Into<String>, location: Vec<Point>) -> Self {
        Self {
            text: text.into(),
            location,
            confidence: None,
        }
    }

    /// Vertical coordinate of the first location point
    pub fn top(&self) -> f32 {
        self.location.first().map(|p| p[1]).unwrap_or(0.0)
    }
}

/// Source of OCR fragments for an image
pub trait OcrProvider {
    /// Recognize text in the image at `image_path`
    fn recognize(&self, image_path: &Path) -> Result<Vec<OcrFragment>, OcrError>;
}

/// Reads a previously saved provider response stored next to the image
///
/// `plates/front.png` is answered from `plates/front.json` (with the default
/// extension).
#[derive(Debug, Clone)]
pub struct SavedResponseProvider {
    extension: String,
}

impl SavedResponseProvider {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Path of the response file for an image
    pub fn response_path(&self, image_path: &Path) -> PathBuf {
        image_path.with_extension(&self.extension)
    }
}

impl Default for SavedResponseProvider {
    fn default() -> Self {
        Self::new("json")
    }
}

impl OcrProvider for SavedResponseProvider {
    fn recognize(&self, image_path: &Path) -> Result<Vec<OcrFragment>, OcrError> {
        let path = self.response_path(image_path);
        let body = std::fs::read_to_string(&path).map_err(|source| OcrError::Io {
            path: path.clone(),
            source,
        })?;

        let fragments = huawei::parse_general_text(&body)?;
        debug!("Read {} fragments from {:?}", fragments.len(), path);
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fragment_top() {
        let fragment = OcrFragment::new("NIJ1234", vec![[10.0, 42.0], [90.0, 40.0], [90.0, 70.0], [10.0, 72.0]]);
        assert_eq!(fragment.top(), 42.0);

        let empty = OcrFragment::new("?", vec![]);
        assert_eq!(empty.top(), 0.0);
    }

    #[test]
    fn test_response_path() {
        let provider = SavedResponseProvider::default();
        assert_eq!(
            provider.response_path(Path::new("captures/capture.png")),
            PathBuf::from("captures/capture.json")
        );
    }

    #[test]
    fn test_saved_response_provider() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("plate.png");
        std::fs::write(
            dir.path().join("plate.json"),
            r#"{"result":{"words_block_list":[{"words":"NIJ1234","location":[[5,10],[80,10],[80,30],[5,30]]}]}}"#,
        )
        .unwrap();

        let fragments = SavedResponseProvider::default().recognize(&image).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "NIJ1234");
    }

    #[test]
    fn test_saved_response_missing() {
        let dir = TempDir::new().unwrap();
        let result = SavedResponseProvider::default().recognize(&dir.path().join("none.png"));
        assert!(matches!(result, Err(OcrError::Io { .. })));
    }
}
