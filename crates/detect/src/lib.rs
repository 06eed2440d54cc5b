//! Sensitive-field detection over OCR output.
//!
//! Each detector is an independent function with the same shape: it takes
//! the recognized text plus the word (or line) list and returns candidate
//! [`RedactionMatch`]es. Detectors only ever read OCR output; location
//! mapping goes through the shared word-run reconstruction in [`span`].

pub mod bsn;
pub mod date;
pub mod mrz;
pub mod number;
pub mod span;

use proefrit_geometry::PixelBox;
use serde::{Deserialize, Serialize};

/// Reason prefix for matches emitted by the fallback-zone layer.
pub const FALLBACK_REASON_PREFIX: &str = "fallback zone";
/// Reason prefix for zones forced by aggressive mode.
pub const AGGRESSIVE_REASON_PREFIX: &str = "aggressive zone";

/// Category of a redacted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKind {
    Bsn,
    DateOfBirth,
    Mrz,
    LicenseNumber,
    DocumentNumber,
    Face,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Bsn => write!(f, "bsn"),
            MatchKind::DateOfBirth => write!(f, "dateOfBirth"),
            MatchKind::Mrz => write!(f, "mrz"),
            MatchKind::LicenseNumber => write!(f, "licenseNumber"),
            MatchKind::DocumentNumber => write!(f, "documentNumber"),
            MatchKind::Face => write!(f, "face"),
        }
    }
}

/// One region to redact and why.
///
/// Created by a detector (from OCR evidence) or by the fallback layer
/// (confidence fixed at 1.0); consumed by the renderer within the same
/// redaction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionMatch {
    pub kind: MatchKind,
    /// Masked excerpt of the matched text, safe for logs and reports.
    pub text: String,
    pub bbox: PixelBox,
    /// Confidence 0-1. Detector matches carry the mean OCR word
    /// confidence / 100; fallback zones are fixed at 1.0.
    pub confidence: f32,
    pub reason: String,
}

impl RedactionMatch {
    /// Whether this match came from the fallback-zone layer rather than
    /// OCR evidence.
    pub fn is_fallback(&self) -> bool {
        self.reason.starts_with(FALLBACK_REASON_PREFIX)
            || self.reason.starts_with(AGGRESSIVE_REASON_PREFIX)
    }
}

/// Mask matched text for logging: short values fully, longer values keep a
/// small prefix and suffix.
pub fn mask_snippet(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    if len <= 4 {
        "*".repeat(len)
    } else {
        let visible = 4.min(len / 3);
        let prefix: String = chars[..visible].iter().collect();
        let suffix: String = chars[len - visible..].iter().collect();
        format!("{}****{}", prefix, suffix)
    }
}
