//! The redaction pipeline.
//!
//! One linear pass per photo: recognize, filter, detect, reconcile
//! against the layout's fallback zones, paint. Failures exit early with
//! an empty match list and no image; the unredacted input is never
//! handed back as a processed result.

use std::time::Instant;

use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use proefrit_detect::{bsn, date, mrz, number, MatchKind, RedactionMatch};
use proefrit_document::{detect_photo, reconcile, DocumentClass};
use proefrit_geometry::{merge_nearby, PixelBox};
use proefrit_ocr::{OcrEngine, OcrOutput};

use crate::error::RedactionError;
use crate::options::RedactionOptions;

/// Match boxes closer than this many pixels are painted as one region.
const REGION_MERGE_GAP: u32 = 4;

/// Serializable outcome of one redaction run. Image bytes travel
/// out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionReport {
    pub success: bool,
    pub matches: Vec<RedactionMatch>,
    pub errors: Vec<String>,
    pub processing_time_ms: u64,
}

/// Redacted image plus its report. `image` is `None` iff the run failed.
#[derive(Debug)]
pub struct RedactionOutput {
    pub image: Option<RgbaImage>,
    pub report: RedactionReport,
}

/// Reject oversized or undecodable input before any OCR work is done.
pub fn validate_input(
    bytes: &[u8],
    options: &RedactionOptions,
) -> Result<DynamicImage, RedactionError> {
    if bytes.is_empty() {
        return Err(RedactionError::InvalidInput("empty input".to_string()));
    }
    if bytes.len() > options.max_image_bytes {
        return Err(RedactionError::InvalidInput(format!(
            "input of {} bytes exceeds the {} byte limit",
            bytes.len(),
            options.max_image_bytes
        )));
    }

    image::load_from_memory(bytes)
        .map_err(|e| RedactionError::InvalidInput(format!("image decoding failed: {}", e)))
}

/// Run the full pipeline over one decoded image.
pub fn run(
    engine: &mut dyn OcrEngine,
    image: &DynamicImage,
    class: DocumentClass,
    options: &RedactionOptions,
) -> RedactionOutput {
    let start = Instant::now();
    let (img_width, img_height) = (image.width(), image.height());
    log::info!(
        "[Pipeline] start {} {}x{}",
        class.key(),
        img_width,
        img_height
    );

    let ocr = match engine.recognize(image, &options.languages) {
        Ok(output) => output,
        Err(e) => {
            log::error!("[Pipeline] recognition failed: {}", e);
            return RedactionOutput {
                image: None,
                report: RedactionReport {
                    success: false,
                    matches: Vec::new(),
                    errors: vec![format!("recognition failed: {}", e)],
                    processing_time_ms: elapsed_ms(start),
                },
            };
        }
    };

    let ocr = drop_low_confidence(ocr, options.confidence_threshold);
    log::debug!(
        "[Pipeline] {} words, {} lines above confidence {}",
        ocr.words.len(),
        ocr.lines.len(),
        options.confidence_threshold
    );

    let mut matches: Vec<RedactionMatch> = Vec::new();
    if options.redact_bsn {
        matches.extend(bsn::detect(&ocr.text, &ocr.words));
    }
    if options.redact_date_of_birth {
        matches.extend(date::detect(&ocr.text, &ocr.words, &options.birth_years));
    }
    if options.redact_mrz {
        matches.extend(mrz::detect(&ocr.lines));
    }
    if options.redact_document_number {
        matches.extend(number::detect(&ocr.text, &ocr.words));
    }
    if options.redact_faces {
        if let Some(m) = detect_photo(class, img_width, img_height) {
            matches.push(m);
        }
    }
    log::info!("[Pipeline] {} detector matches", matches.len());

    reconcile(&mut matches, class, img_width, img_height, options.aggressive);
    log::info!("[Pipeline] {} regions after reconciliation", matches.len());

    let mut rgba = image.to_rgba8();
    // Coalesce abutting text boxes so hairline gaps between adjacent
    // fields cannot leak glyph fragments; the report keeps the individual
    // matches. The photo region stays out of the merge, its box can graze
    // a text zone and would union most of the card with it.
    let mut face_boxes: Vec<PixelBox> = Vec::new();
    let mut text_boxes: Vec<PixelBox> = Vec::new();
    for m in &matches {
        if m.kind == MatchKind::Face {
            face_boxes.push(m.bbox);
        } else {
            text_boxes.push(m.bbox);
        }
    }
    let mut boxes = merge_nearby(text_boxes, REGION_MERGE_GAP);
    boxes.extend(face_boxes);
    proefrit_render::redact_regions(&mut rgba, &boxes, options.fill_color);

    let processing_time_ms = elapsed_ms(start);
    log::info!("[Pipeline] done in {} ms", processing_time_ms);

    RedactionOutput {
        image: Some(rgba),
        report: RedactionReport {
            success: true,
            matches,
            errors: Vec::new(),
            processing_time_ms,
        },
    }
}

/// Drop words and lines below the confidence threshold.
///
/// The full text is kept as recognized: a low-confidence hit can still
/// appear in text, but without an anchoring word it cannot be located and
/// falls through to the fallback zones.
fn drop_low_confidence(mut ocr: OcrOutput, threshold: f32) -> OcrOutput {
    ocr.words.retain(|w| w.confidence >= threshold);
    ocr.lines.retain(|l| l.confidence >= threshold);
    ocr
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
