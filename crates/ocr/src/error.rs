//! OCR error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("image handling failed: {0}")]
    Image(String),

    #[error("recognition failed: {0}")]
    Recognition(String),

    #[error("recognition timed out after {0} ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
