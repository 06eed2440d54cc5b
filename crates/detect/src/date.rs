//! Date-of-birth detection.
//!
//! Any date on an ID document is a candidate, but only birth dates are
//! regulated; issue and expiry dates must stay readable. A matched date is
//! classified as date of birth when a birth keyword sits within a fixed
//! character window, or failing that when its year falls in a plausible
//! birth-year range. A window with an expiry keyword and no birth keyword
//! disqualifies the date outright.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;

use proefrit_ocr::OcrWord;

use crate::span::{digits_only, locate_run};
use crate::{mask_snippet, MatchKind, RedactionMatch};

/// Default plausible birth-year range.
pub const DEFAULT_BIRTH_YEARS: RangeInclusive<i32> = 1920..=2010;

const WINDOW_BEFORE: usize = 40;
const WINDOW_AFTER: usize = 20;

const BIRTH_KEYWORDS: &[&str] = &["geboortedatum", "geboren", "geb", "birth", "dob"];
const EXPIRY_KEYWORDS: &[&str] = &["geldig", "verval", "expir"];

/// Day-month-year with a 4-digit year: dd-mm-yyyy, dd/mm/yyyy, dd.mm.yyyy.
static DMY4: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2})[./\-](\d{2})[./\-](\d{4})\b").expect("static pattern"));
/// ISO order: yyyy-mm-dd.
static YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("static pattern"));
/// Two-digit-year variant: dd-mm-yy.
static DMY2: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2})[./\-](\d{2})[./\-](\d{2})\b").expect("static pattern"));

struct DateHit {
    digits: String,
    start: usize,
    end: usize,
    year: i32,
}

fn scan_dates(text: &str) -> Vec<DateHit> {
    let mut hits: Vec<DateHit> = Vec::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    let mut push = |start: usize, end: usize, digits: String, year: i32| {
        if seen.insert((start, end)) {
            hits.push(DateHit {
                digits,
                start,
                end,
                year,
            });
        }
    };

    for caps in DMY4.captures_iter(text) {
        if let Some(m) = caps.get(0) {
            let year: i32 = caps[3].parse().unwrap_or(0);
            push(m.start(), m.end(), digits_only(m.as_str()), year);
        }
    }
    for caps in YMD.captures_iter(text) {
        if let Some(m) = caps.get(0) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            push(m.start(), m.end(), digits_only(m.as_str()), year);
        }
    }
    for caps in DMY2.captures_iter(text) {
        if let Some(m) = caps.get(0) {
            let yy: i32 = caps[3].parse().unwrap_or(0);
            push(m.start(), m.end(), digits_only(m.as_str()), expand_two_digit_year(yy));
        }
    }

    hits
}

/// Two-digit years: 00-10 read as 2000s, the rest as 1900s.
fn expand_two_digit_year(yy: i32) -> i32 {
    if yy <= 10 {
        2000 + yy
    } else {
        1900 + yy
    }
}

fn clamp_char_boundary(text: &str, mut idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn keyword_window(text: &str, start: usize, end: usize) -> String {
    let w_start = clamp_char_boundary(text, start.saturating_sub(WINDOW_BEFORE));
    let w_end = clamp_char_boundary(text, (end + WINDOW_AFTER).min(text.len()));
    text[w_start..w_end].to_lowercase()
}

/// Classify a date as date of birth, returning the reason, or `None`.
fn classify(window: &str, year: i32, birth_years: &RangeInclusive<i32>) -> Option<&'static str> {
    let has_birth = BIRTH_KEYWORDS.iter().any(|k| window.contains(k));
    let has_expiry = EXPIRY_KEYWORDS.iter().any(|k| window.contains(k));

    if has_expiry && !has_birth {
        return None;
    }
    if has_birth {
        return Some("birth keyword near date");
    }
    if birth_years.contains(&year) {
        return Some("year within birth range");
    }
    None
}

/// Detect birth dates in one recognition pass.
pub fn detect(
    text: &str,
    words: &[OcrWord],
    birth_years: &RangeInclusive<i32>,
) -> Vec<RedactionMatch> {
    let mut matches = Vec::new();
    let mut emitted: HashSet<String> = HashSet::new();

    for hit in scan_dates(text) {
        let window = keyword_window(text, hit.start, hit.end);
        let Some(reason) = classify(&window, hit.year, birth_years) else {
            continue;
        };
        if !emitted.insert(hit.digits.clone()) {
            continue;
        }

        match locate_run(words, &hit.digits, digits_only) {
            Some((bbox, confidence)) => {
                log::info!(
                    "[Detect] birth date {} ({}) at {:?}",
                    mask_snippet(&hit.digits),
                    reason,
                    bbox
                );
                matches.push(RedactionMatch {
                    kind: MatchKind::DateOfBirth,
                    text: mask_snippet(&hit.digits),
                    bbox,
                    confidence: confidence / 100.0,
                    reason: reason.to_string(),
                });
            }
            None => {
                log::warn!(
                    "[Detect] birth date {} not locatable in word list",
                    mask_snippet(&hit.digits)
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

    fn word(text: &str, x: u32) -> OcrWord {
        OcrWord {
            text: text.to_string(),
            confidence: 85.0,
            bbox: PixelBox::new(x, 10, 50, 15),
        }
    }

    #[test]
    fn test_birth_keyword_classifies() {
        let text = "Geboren 03-07-1985 te Utrecht";
        let words = vec![word("Geboren", 0), word("03-07-1985", 60)];
        let matches = detect(text, &words, &DEFAULT_BIRTH_YEARS);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, MatchKind::DateOfBirth);
        assert_eq!(matches[0].reason, "birth keyword near date");
    }

    #[test]
    fn test_expiry_keyword_disqualifies() {
        // Year inside the birth range, but the only nearby keyword is an
        // expiry one.
        let text = "geldig tot 03-07-2009";
        let words = vec![word("geldig", 0), word("tot", 60), word("03-07-2009", 100)];
        assert!(detect(text, &words, &DEFAULT_BIRTH_YEARS).is_empty());
    }

    #[test]
    fn test_birth_keyword_beats_expiry_keyword() {
        let text = "geboortedatum 03-07-1985 geldig tot";
        let words = vec![word("geboortedatum", 0), word("03-07-1985", 120)];
        assert_eq!(detect(text, &words, &DEFAULT_BIRTH_YEARS).len(), 1);
    }

    #[test]
    fn test_year_range_without_keyword() {
        let text = "3 03-07-1985";
        let words = vec![word("3", 0), word("03-07-1985", 20)];
        let matches = detect(text, &words, &DEFAULT_BIRTH_YEARS);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].reason, "year within birth range");
    }

    #[test]
    fn test_year_outside_range_without_keyword() {
        let text = "afgiftedatum 03-07-2019";
        let words = vec![word("afgiftedatum", 0), word("03-07-2019", 120)];
        assert!(detect(text, &words, &DEFAULT_BIRTH_YEARS).is_empty());
    }

    #[test]
    fn test_iso_and_two_digit_formats() {
        assert_eq!(scan_dates("1985-07-03").len(), 1);
        assert_eq!(scan_dates("03.07.85").len(), 1);
        assert_eq!(scan_dates("03/07/1985").len(), 1);

        let hits = scan_dates("03-07-85");
        assert_eq!(hits[0].year, 1985);
        let hits = scan_dates("03-07-05");
        assert_eq!(hits[0].year, 2005);
    }

    #[test]
    fn test_custom_year_range() {
        let text = "x 03-07-1985";
        let words = vec![word("x", 0), word("03-07-1985", 20)];
        assert!(detect(text, &words, &(1990..=2000)).is_empty());
    }

    #[test]
    fn test_duplicate_dates_emit_once() {
        let text = "geboren 03-07-1985 geb 03-07-1985";
        let words = vec![word("geboren", 0), word("03-07-1985", 80)];
        assert_eq!(detect(text, &words, &DEFAULT_BIRTH_YEARS).len(), 1);
    }
}
