//! Redaction options.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use proefrit_detect::date::DEFAULT_BIRTH_YEARS;

const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 60.0;
const DEFAULT_JPEG_QUALITY: u8 = 90;

/// What to redact and how. All fields have working defaults, so a partial
/// JSON object deserializes into a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RedactionOptions {
    pub redact_bsn: bool,
    pub redact_date_of_birth: bool,
    pub redact_mrz: bool,
    /// Covers both document numbers and licence numbers.
    pub redact_document_number: bool,
    pub redact_faces: bool,

    /// OCR language models, passed through to the engine.
    pub languages: Vec<String>,
    /// Words below this OCR confidence (0-100) cannot anchor a match
    /// location; their hits fall through to the fallback zones.
    pub confidence_threshold: f32,
    /// Years considered plausible birth years by the date detector.
    pub birth_years: RangeInclusive<i32>,

    /// Fill color for redacted regions, RGB.
    pub fill_color: [u8; 3],
    /// Force mandatory zones on driving-licence fronts regardless of what
    /// the detectors found.
    pub aggressive: bool,

    /// Inputs larger than this are rejected before decoding.
    pub max_image_bytes: usize,
    /// Quality of the re-encoded JPEG output.
    pub jpeg_quality: u8,
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            redact_bsn: true,
            redact_date_of_birth: true,
            redact_mrz: true,
            redact_document_number: true,
            redact_faces: true,
            languages: vec!["nld".to_string(), "eng".to_string()],
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            birth_years: DEFAULT_BIRTH_YEARS,
            fill_color: [0, 0, 0],
            aggressive: false,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = RedactionOptions::default();
        assert!(opts.redact_bsn);
        assert!(!opts.aggressive);
        assert_eq!(opts.fill_color, [0, 0, 0]);
        assert_eq!(opts.max_image_bytes, 10 * 1024 * 1024);
        assert_eq!(opts.languages, vec!["nld", "eng"]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: RedactionOptions =
            serde_json::from_str(r#"{"aggressive": true, "jpegQuality": 75}"#).unwrap();
        assert!(opts.aggressive);
        assert_eq!(opts.jpeg_quality, 75);
        assert!(opts.redact_mrz);
        assert_eq!(opts.confidence_threshold, 60.0);
    }
}
