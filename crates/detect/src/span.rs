//! Word-run geometry reconstruction.
//!
//! Pattern detectors match against the recognized text as one string, but
//! redaction needs pixel regions. The shared strategy: walk the OCR word
//! list, accumulate normalized runs of consecutive words until the
//! concatenation contains the target, then union the contributing word
//! boxes with a fixed padding. If no contiguous run reconstructs the
//! target the caller drops the match and the fallback layer takes over.

use proefrit_geometry::{union_all, PixelBox};
use proefrit_ocr::OcrWord;

/// Extra pixels around a reconstructed region.
pub const RUN_PADDING: u32 = 4;

/// Extra normalized characters a run may accumulate past the target length
/// before the search moves to the next start word. Keeps runs minimal while
/// tolerating separator digits glued onto neighboring words.
const RUN_SLACK: usize = 6;

/// Digits of `s`, separators and letters removed.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Uppercased alphanumeric characters of `s`.
pub fn normalize_alnum(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Locate `target` in a contiguous run of OCR words.
///
/// `normalize` maps each word to the alphabet the target is expressed in
/// (digits for numbers, alphanumerics for document codes). Returns the
/// padded union box of the contributing words and their mean confidence.
pub fn locate_run(
    words: &[OcrWord],
    target: &str,
    normalize: fn(&str) -> String,
) -> Option<(PixelBox, f32)> {
    if target.is_empty() {
        return None;
    }

    for start in 0..words.len() {
        let mut concat = String::new();
        let mut boxes: Vec<PixelBox> = Vec::new();
        let mut conf_sum = 0.0f32;

        for word in &words[start..] {
            let normalized = normalize(&word.text);
            if normalized.is_empty() {
                // A word contributing nothing cannot start or bridge a run.
                break;
            }

            concat.push_str(&normalized);
            boxes.push(word.bbox);
            conf_sum += word.confidence;

            if concat.contains(target) {
                let bbox = union_all(&boxes)?.padded(RUN_PADDING);
                let confidence = conf_sum / boxes.len() as f32;
                return Some((bbox, confidence));
            }

            if concat.len() > target.len() + RUN_SLACK {
                break;
            }
        }
    }

    None
}
