//! BSN (burgerservicenummer) detection.
//!
//! Candidates are 9-digit substrings, bare or 3-3-3 grouped; a candidate
//! is a BSN iff it passes the elfproef checksum. Location mapping runs
//! through the shared word-run reconstruction; a validated BSN that no
//! contiguous word run reconstructs is dropped and left to the fallback
//! zones.

use once_cell::sync::Lazy;
use regex::Regex;

use proefrit_ocr::OcrWord;

use crate::span::{digits_only, locate_run};
use crate::{mask_snippet, MatchKind, RedactionMatch};

static BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{9}\b").expect("static pattern"));
static GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}[ .\-]\d{3}[ .\-]\d{3}\b").expect("static pattern"));

/// Elfproef weights for digits d1..d9.
const WEIGHTS: [i32; 9] = [9, 8, 7, 6, 5, 4, 3, 2, -1];

/// Elfproef: weighted digit sum divisible by 11, all-zero rejected.
///
/// `digits` must be exactly 9 ASCII digits; anything else is invalid.
pub fn is_valid_bsn(digits: &str) -> bool {
    if digits.len() != 9 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if digits == "000000000" {
        return false;
    }

    let sum: i32 = digits
        .chars()
        .zip(WEIGHTS.iter())
        .map(|(c, w)| (c as i32 - '0' as i32) * w)
        .sum();

    sum % 11 == 0
}

/// Extract elfproef-valid BSN candidates from text, normalized to bare
/// digits and deduplicated in order of first occurrence.
pub fn extract_valid_bsns(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for pattern in [&*BARE, &*GROUPED] {
        for m in pattern.find_iter(text) {
            let normalized = digits_only(m.as_str());
            if is_valid_bsn(&normalized) && !found.contains(&normalized) {
                found.push(normalized);
            }
        }
    }

    found
}

/// Detect BSNs in one recognition pass.
pub fn detect(text: &str, words: &[OcrWord]) -> Vec<RedactionMatch> {
    let mut matches = Vec::new();

    for bsn in extract_valid_bsns(text) {
        match locate_run(words, &bsn, digits_only) {
            Some((bbox, confidence)) => {
                log::info!("[Detect] BSN {} at {:?}", mask_snippet(&bsn), bbox);
                matches.push(RedactionMatch {
                    kind: MatchKind::Bsn,
                    text: mask_snippet(&bsn),
                    bbox,
                    confidence: confidence / 100.0,
                    reason: "elfproef-valid BSN in OCR text".to_string(),
                });
            }
            None => {
                // Fallback zones guarantee coverage for unlocatable hits.
                log::warn!(
                    "[Detect] BSN {} found in text but not locatable in word list",
                    mask_snippet(&bsn)
                );
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use proefrit_geometry::PixelBox;

    #[test]
    fn test_elfproef_vectors() {
        assert!(is_valid_bsn("111222333"));
        assert!(is_valid_bsn("123456782"));
        assert!(!is_valid_bsn("123456789"));
        assert!(!is_valid_bsn("000000000"));
        assert!(!is_valid_bsn("12345678"));
        assert!(!is_valid_bsn("1234567890"));
        assert!(!is_valid_bsn("12345678a"));
    }

    #[test]
    fn test_extract_grouped_equals_bare() {
        let bare = extract_valid_bsns("bsn 123456782");
        let grouped = extract_valid_bsns("bsn 123.456.782");
        assert_eq!(bare, grouped);
        assert_eq!(bare, vec!["123456782".to_string()]);
    }

    #[test]
    fn test_extract_dedupes() {
        let found = extract_valid_bsns("123456782 en nogmaals 123-456-782");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_extract_rejects_invalid_checksum() {
        assert!(extract_valid_bsns("nummer 123456789").is_empty());
    }

    #[test]
    fn test_extract_ignores_longer_digit_runs() {
        // 9-digit window inside a longer run is not a candidate.
        assert!(extract_valid_bsns("1234567821").is_empty());
    }

    #[test]
    fn test_detect_unions_contributing_words() {
        let words = vec![
            OcrWord {
                text: "123".into(),
                confidence: 80.0,
                bbox: PixelBox::new(100, 50, 30, 20),
            },
            OcrWord {
                text: "456".into(),
                confidence: 70.0,
                bbox: PixelBox::new(140, 50, 30, 20),
            },
            OcrWord {
                text: "782".into(),
                confidence: 90.0,
                bbox: PixelBox::new(180, 50, 30, 20),
            },
        ];
        let matches = detect("123 456 782", &words);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, MatchKind::Bsn);
        assert_eq!(matches[0].bbox, PixelBox::new(96, 46, 118, 28));
        assert!((matches[0].confidence - 0.8).abs() < 0.001);
        assert_eq!(matches[0].text, "123****782");
    }

    #[test]
    fn test_detect_drops_unlocatable() {
        let matches = detect("123456782", &[]);
        assert!(matches.is_empty());
    }
}
