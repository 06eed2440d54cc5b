//! OCR engine integration.
//!
//! The recognition engine is a black box behind the [`OcrEngine`] trait: one
//! invocation yields the full recognized text plus word- and line-level
//! results with pixel bounding boxes and 0-100 confidence scores. The
//! shipped implementation wraps the Tesseract CLI; engines are reused
//! through [`EnginePool`] with one engine per concurrent job.

mod error;
mod pool;
mod tesseract;

pub use error::OcrError;
pub use pool::{EnginePool, PooledEngine};
pub use tesseract::{get_tesseract_version, TesseractConfig, TesseractEngine};

use image::DynamicImage;
use proefrit_geometry::PixelBox;
use serde::{Deserialize, Serialize};

/// One recognized word. Read-only product of a recognition pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    /// Confidence 0-100.
    pub confidence: f32,
    pub bbox: PixelBox,
}

/// One recognized text line. Read-only product of a recognition pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    /// Confidence 0-100, averaged over the line's words.
    pub confidence: f32,
    pub bbox: PixelBox,
}

/// Full output of one recognition pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Full recognized text, lines joined with newlines.
    pub text: String,
    pub words: Vec<OcrWord>,
    pub lines: Vec<OcrLine>,
}

/// Engine identification for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineInfo {
    pub version: Option<String>,
    pub languages: Vec<String>,
    pub psm: u8,
    pub oem: u8,
}

/// Recognition engine contract.
///
/// A single engine instance is not safe for concurrent recognition; callers
/// either own one engine per job or acquire one from an [`EnginePool`].
pub trait OcrEngine: Send {
    /// Run one recognition pass over `image`.
    ///
    /// `languages` overrides the engine's configured language set when
    /// non-empty.
    fn recognize(&mut self, image: &DynamicImage, languages: &[String])
        -> Result<OcrOutput, OcrError>;

    fn info(&self) -> EngineInfo;
}
