//! Redaction of sensitive fields on photographed identity documents.
//!
//! Dutch ID cards, driving licences and passports uploaded as photos go
//! through one pipeline: OCR, field detection (BSN with elfproef, birth
//! dates, MRZ, document numbers), template photo regions, fallback-zone
//! reconciliation, and opaque rendering. The design is fail-closed: when
//! OCR finds nothing, the layout's fallback zones are painted anyway.

mod error;
mod options;
mod pipeline;
mod redactor;

pub use error::RedactionError;
pub use options::RedactionOptions;
pub use pipeline::{run, validate_input, RedactionOutput, RedactionReport};
pub use redactor::Redactor;

pub use proefrit_detect::{MatchKind, RedactionMatch};
pub use proefrit_document::{DocumentClass, DocumentSide, DocumentType};
pub use proefrit_geometry::{PercentBox, PixelBox};
pub use proefrit_ocr::{EngineInfo, OcrEngine, OcrError, OcrOutput, TesseractConfig};
