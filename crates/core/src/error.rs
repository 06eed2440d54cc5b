//! Top-level error type.
//!
//! Detection misses are never errors: a photo where nothing is found
//! still redacts its fallback zones. Errors are reserved for input the
//! pipeline cannot work on and for infrastructure failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedactionError {
    /// Input rejected before OCR: too large, empty, or not a decodable image.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("OCR failed: {0}")]
    Ocr(#[from] proefrit_ocr::OcrError),

    #[error("rendering failed: {0}")]
    Render(#[from] proefrit_render::RenderError),

    /// The pipeline ran but produced no redacted image; details are in the
    /// report's error list.
    #[error("redaction pipeline failed: {0}")]
    Pipeline(String),
}
