//! Machine Readable Zone detection.
//!
//! MRZ lines are fixed-format runs of uppercase letters, digits and `<`.
//! Detection is line-based: a recognized line qualifies when, after
//! whitespace removal, it is at least 30 characters drawn solely from that
//! alphabet. Every qualifying line becomes one match with a padded box.

use proefrit_ocr::OcrLine;

use crate::{mask_snippet, MatchKind, RedactionMatch};

/// Minimum compacted length of an MRZ line (TD1 lines are 30, TD3 are 44).
pub const MIN_MRZ_LEN: usize = 30;

/// Extra pixels around a matched MRZ line.
const MRZ_PADDING: u32 = 6;

/// Whether a recognized line is an MRZ line.
pub fn is_mrz_line(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact.chars().count() >= MIN_MRZ_LEN
        && compact
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '<')
}

/// Detect MRZ lines in one recognition pass.
pub fn detect(lines: &[OcrLine]) -> Vec<RedactionMatch> {
    let mut matches = Vec::new();

    for line in lines {
        if !is_mrz_line(&line.text) {
            continue;
        }

        let bbox = line.bbox.padded(MRZ_PADDING);
        log::info!("[Detect] MRZ line {} at {:?}", mask_snippet(&line.text), bbox);
        matches.push(RedactionMatch {
            kind: MatchKind::Mrz,
            text: mask_snippet(&line.text),
            bbox,
            confidence: line.confidence / 100.0,
            reason: "machine readable zone line".to_string(),
        });
    }

    matches
}
