//! Document classification and template-based region knowledge.
//!
//! The document type and side are supplied by the upload context, never
//! inferred here. They key two static tables: the expected photo region
//! per layout ([`face`]) and the fallback zones that must be covered even
//! when OCR finds nothing ([`fallback`]).

pub mod face;
pub mod fallback;

pub use face::detect_photo;
pub use fallback::{reconcile, zones_for, FallbackZone, COVERAGE_THRESHOLD};

use serde::{Deserialize, Serialize};

/// Kind of identity document, as classified by the upload flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    Id,
    DriversLicense,
    Passport,
    Unknown,
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Id => write!(f, "id"),
            DocumentType::DriversLicense => write!(f, "driversLicense"),
            DocumentType::Passport => write!(f, "passport"),
            DocumentType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Which side of the document was photographed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSide {
    Front,
    Back,
}

impl std::fmt::Display for DocumentSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentSide::Front => write!(f, "front"),
            DocumentSide::Back => write!(f, "back"),
        }
    }
}

/// Document type and side together; the template-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentClass {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub side: DocumentSide,
}

impl DocumentClass {
    pub fn new(doc_type: DocumentType, side: DocumentSide) -> Self {
        Self { doc_type, side }
    }

    /// Lookup/logging key, e.g. `driversLicense_front`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.doc_type, self.side)
    }
}
