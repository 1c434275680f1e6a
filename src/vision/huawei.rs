//! Huawei Cloud general-text OCR response decoding

use serde::Deserialize;

use super::{OcrError, OcrFragment, Point};

#[derive(Debug, Deserialize)]
struct GeneralTextResponse {
    result: Option<GeneralTextResult>,
    error_code: Option<String>,
    error_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeneralTextResult {
    #[serde(default)]
    words_block_list: Vec<WordsBlock>,
}

#[derive(Debug, Deserialize)]
struct WordsBlock {
    words: String,
    #[serde(default)]
    location: Vec<Point>,
    confidence: Option<f32>,
}

/// Decode a `RecognizeGeneralText` response body into fragments
///
/// A response without a result, or with an empty block list, yields no
/// fragments. An error body from the provider becomes [`OcrError::Provider`].
pub fn parse_general_text(body: &str) -> Result<Vec<OcrFragment>, OcrError> {
    let response: GeneralTextResponse = serde_json::from_str(body)?;

    if let Some(code) = response.error_code {
        return Err(OcrError::Provider {
            code,
            message: response.error_msg.unwrap_or_default(),
        });
    }

    let blocks = response
        .result
        .map(|r| r.words_block_list)
        .unwrap_or_default();

    Ok(blocks
        .into_iter()
        .map(|b| OcrFragment {
            confidence: b.confidence,
            ..OcrFragment::new(b.words, b.location)
        })
        .collect())
}
