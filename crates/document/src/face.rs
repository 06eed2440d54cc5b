//! Template-based photo-region lookup.
//!
//! No image analysis: Dutch identity documents have standardized layouts,
//! so the holder photo sits in a known region per document type and side.
//! Accuracy is bounded by that standardization, which the fixed template
//! confidence reflects.

use proefrit_detect::{MatchKind, RedactionMatch};
use proefrit_geometry::PercentBox;

use crate::{DocumentClass, DocumentSide, DocumentType};

/// Fixed confidence for template-located photos.
pub const FACE_TEMPLATE_CONFIDENCE: f32 = 0.8;

/// Expected photo region in percent of the image, or `None` when the
/// layout has no photo on that side.
pub fn photo_zone(class: DocumentClass) -> Option<PercentBox> {
    match (class.doc_type, class.side) {
        // Dutch ID card: photo on the right of the front.
        (DocumentType::Id, DocumentSide::Front) => Some(PercentBox::new(65.0, 15.0, 30.0, 45.0)),
        // Driving licence: photo on the left of the front.
        (DocumentType::DriversLicense, DocumentSide::Front) => {
            Some(PercentBox::new(4.0, 25.0, 24.0, 55.0))
        }
        // Passport holder page: photo on the left.
        (DocumentType::Passport, DocumentSide::Front) => {
            Some(PercentBox::new(6.0, 28.0, 28.0, 52.0))
        }
        _ => None,
    }
}

/// Zero or one photo match for the given document and image dimensions.
pub fn detect_photo(
    class: DocumentClass,
    img_width: u32,
    img_height: u32,
) -> Option<RedactionMatch> {
    let zone = photo_zone(class)?;
    let bbox = zone.to_pixels(img_width, img_height);

    log::info!("[Detect] photo template for {} at {:?}", class.key(), bbox);

    Some(RedactionMatch {
        kind: MatchKind::Face,
        text: String::new(),
        bbox,
        confidence: FACE_TEMPLATE_CONFIDENCE,
        reason: format!("photo template for {}", class.key()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proefrit_geometry::PixelBox;

    #[test]
    fn test_id_front_has_photo_zone() {
        let class = DocumentClass::new(DocumentType::Id, DocumentSide::Front);
        let m = detect_photo(class, 1000, 600).unwrap();
        assert_eq!(m.kind, MatchKind::Face);
        assert_eq!(m.bbox, PixelBox::new(650, 90, 300, 270));
        assert!((m.confidence - FACE_TEMPLATE_CONFIDENCE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_back_sides_have_no_photo_zone() {
        for doc_type in [
            DocumentType::Id,
            DocumentType::DriversLicense,
            DocumentType::Passport,
            DocumentType::Unknown,
        ] {
            let class = DocumentClass::new(doc_type, DocumentSide::Back);
            assert!(detect_photo(class, 1000, 600).is_none());
        }
    }

    #[test]
    fn test_unknown_front_has_no_photo_zone() {
        let class = DocumentClass::new(DocumentType::Unknown, DocumentSide::Front);
        assert!(detect_photo(class, 1000, 600).is_none());
    }
}
