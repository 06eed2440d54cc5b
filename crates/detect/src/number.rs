//! Document- and license-number detection.
//!
//! Dutch driving-licence numbers are 10 digits, printed bare or grouped
//! 3-3-4; other ID-style document numbers are short alphanumeric codes.
//! Ten-digit hits classify as `LicenseNumber`, the rest as
//! `DocumentNumber`. Hits are deduplicated by their normalized form so
//! overlapping pattern variants never double-count.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use proefrit_ocr::OcrWord;

use crate::span::{digits_only, locate_run, normalize_alnum};
use crate::{mask_snippet, MatchKind, RedactionMatch};

/// Ten digits, optionally grouped 3-3-4.
static TEN_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}[ .\-]?\d{3}[ .\-]?\d{4}\b").expect("static pattern"));
/// Short alphanumeric ID-style codes (e.g. document numbers like SPECI2014).
static ALNUM_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z0-9]{8,9}\b").expect("static pattern"));

fn is_id_style_code(code: &str) -> bool {
    code.chars().any(|c| c.is_ascii_uppercase()) && code.chars().any(|c| c.is_ascii_digit())
}

/// Detect document and license numbers in one recognition pass.
pub fn detect(text: &str, words: &[OcrWord]) -> Vec<RedactionMatch> {
    let mut matches = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for m in TEN_DIGIT.find_iter(text) {
        let normalized = digits_only(m.as_str());
        if !seen.insert(normalized.clone()) {
            continue;
        }
        push_match(
            &mut matches,
            words,
            MatchKind::LicenseNumber,
            &normalized,
            digits_only,
            "10-digit licence number pattern",
        );
    }

    for m in ALNUM_CODE.find_iter(text) {
        if !is_id_style_code(m.as_str()) {
            continue;
        }
        let normalized = normalize_alnum(m.as_str());
        if !seen.insert(normalized.clone()) {
            continue;
        }
        push_match(
            &mut matches,
            words,
            MatchKind::DocumentNumber,
            &normalized,
            normalize_alnum,
            "alphanumeric document number pattern",
        );
    }

    matches
}

fn push_match(
    matches: &mut Vec<RedactionMatch>,
    words: &[OcrWord],
    kind: MatchKind,
    target: &str,
    normalize: fn(&str) -> String,
    reason: &str,
) {
    match locate_run(words, target, normalize) {
        Some((bbox, confidence)) => {
            log::info!("[Detect] {} {} at {:?}", kind, mask_snippet(target), bbox);
            matches.push(RedactionMatch {
                kind,
                text: mask_snippet(target),
                bbox,
                confidence: confidence / 100.0,
                reason: reason.to_string(),
            });
        }
        None => {
            log::warn!(
                "[Detect] {} {} not locatable in word list",
                kind,
                mask_snippet(target)
            );
        }
    }
}
