//! End-to-end pipeline tests against a scripted OCR engine.

use image::{DynamicImage, Rgba, RgbaImage};

use proefrit_core::{
    run, DocumentClass, DocumentSide, DocumentType, MatchKind, RedactionOptions,
};
use proefrit_geometry::{PercentBox, PixelBox};
use proefrit_ocr::{EngineInfo, OcrEngine, OcrError, OcrLine, OcrOutput, OcrWord};

/// Engine that replays a fixed recognition result, or fails when given
/// none.
struct MockEngine {
    output: Option<OcrOutput>,
}

impl MockEngine {
    fn with(output: OcrOutput) -> Self {
        Self {
            output: Some(output),
        }
    }

    fn failing() -> Self {
        Self { output: None }
    }
}

impl OcrEngine for MockEngine {
    fn recognize(
        &mut self,
        _image: &DynamicImage,
        _languages: &[String],
    ) -> Result<OcrOutput, OcrError> {
        self.output
            .clone()
            .ok_or_else(|| OcrError::Recognition("scripted failure".to_string()))
    }

    fn info(&self) -> EngineInfo {
        EngineInfo {
            version: Some("mock".to_string()),
            languages: vec!["nld".to_string()],
            psm: 6,
            oem: 1,
        }
    }
}

fn white_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([255, 255, 255, 255]),
    ))
}

fn word(text: &str, x: u32, confidence: f32) -> OcrWord {
    OcrWord {
        text: text.to_string(),
        confidence,
        bbox: PixelBox::new(x, 50, 30, 20),
    }
}

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[test]
fn test_mrz_line_redacted_end_to_end() {
    let mrz_text = "IDNLD1234567893<<<<<<<<<<<<<<<0";
    let mut engine = MockEngine::with(OcrOutput {
        text: mrz_text.to_string(),
        words: Vec::new(),
        lines: vec![OcrLine {
            text: mrz_text.to_string(),
            confidence: 80.0,
            bbox: PixelBox::new(20, 500, 600, 24),
        }],
    });

    let image = white_image(1000, 600);
    let class = DocumentClass::new(DocumentType::Id, DocumentSide::Back);
    let output = run(&mut engine, &image, class, &RedactionOptions::default());

    assert!(output.report.success);
    // One MRZ detector match; the MRZ fallback zone is thereby covered,
    // while the BSN zone at the top still fires.
    let mrz: Vec<_> = output
        .report
        .matches
        .iter()
        .filter(|m| m.kind == MatchKind::Mrz && !m.is_fallback())
        .collect();
    assert_eq!(mrz.len(), 1);
    assert_eq!(mrz[0].bbox, PixelBox::new(14, 494, 612, 36));
    assert!(output
        .report
        .matches
        .iter()
        .any(|m| m.kind == MatchKind::Bsn && m.is_fallback()));
    assert_eq!(output.report.matches.len(), 2);

    let redacted = output.image.unwrap();
    assert_eq!(redacted.dimensions(), (1000, 600));
    assert_eq!(*redacted.get_pixel(300, 510), BLACK);
    assert_eq!(*redacted.get_pixel(700, 20), WHITE);
}

#[test]
fn test_bsn_words_unioned_and_painted() {
    let mut engine = MockEngine::with(OcrOutput {
        text: "123 456 782".to_string(),
        words: vec![
            word("123", 100, 80.0),
            word("456", 140, 70.0),
            word("782", 180, 90.0),
        ],
        lines: Vec::new(),
    });

    let image = white_image(800, 400);
    // Licence backs have no fallback zones or photo region, so the BSN
    // match is the only region.
    let class = DocumentClass::new(DocumentType::DriversLicense, DocumentSide::Back);
    let output = run(&mut engine, &image, class, &RedactionOptions::default());

    assert_eq!(output.report.matches.len(), 1);
    let m = &output.report.matches[0];
    assert_eq!(m.kind, MatchKind::Bsn);
    assert_eq!(m.bbox, PixelBox::new(96, 46, 118, 28));
    assert_eq!(m.text, "123****782");

    let redacted = output.image.unwrap();
    assert_eq!(*redacted.get_pixel(150, 60), BLACK);
    assert_eq!(*redacted.get_pixel(400, 200), WHITE);
}

#[test]
fn test_low_confidence_word_cannot_anchor_a_match() {
    let mut engine = MockEngine::with(OcrOutput {
        text: "123456782".to_string(),
        words: vec![word("123456782", 100, 40.0)],
        lines: Vec::new(),
    });

    let image = white_image(800, 400);
    let class = DocumentClass::new(DocumentType::DriversLicense, DocumentSide::Back);
    let output = run(&mut engine, &image, class, &RedactionOptions::default());

    assert!(output.report.success);
    assert!(output.report.matches.is_empty());
    let redacted = output.image.unwrap();
    assert_eq!(*redacted.get_pixel(110, 55), WHITE);
}

#[test]
fn test_aggressive_redacts_field5_with_empty_ocr() {
    let mut engine = MockEngine::with(OcrOutput::default());

    let image = white_image(1000, 600);
    let class = DocumentClass::new(DocumentType::DriversLicense, DocumentSide::Front);
    let options = RedactionOptions {
        aggressive: true,
        ..Default::default()
    };
    let output = run(&mut engine, &image, class, &options);

    assert!(output.report.success);
    let field5 = PercentBox::new(25.0, 78.0, 70.0, 14.0).to_pixels(1000, 600);
    let forced: Vec<_> = output
        .report
        .matches
        .iter()
        .filter(|m| m.reason.starts_with("aggressive zone"))
        .collect();
    assert_eq!(forced.len(), 1);
    assert_eq!(forced[0].bbox, field5);
    // Photo template plus the non-mandatory date zone come along.
    assert!(output
        .report
        .matches
        .iter()
        .any(|m| m.kind == MatchKind::Face));

    let redacted = output.image.unwrap();
    assert_eq!(*redacted.get_pixel(600, 500), BLACK);
    // The photo region and the forced zone stay separate fills; the area
    // between them is untouched.
    assert_eq!(*redacted.get_pixel(600, 200), WHITE);
}

#[test]
fn test_engine_failure_yields_no_image() {
    let mut engine = MockEngine::failing();

    let image = white_image(400, 300);
    let class = DocumentClass::new(DocumentType::Id, DocumentSide::Front);
    let output = run(&mut engine, &image, class, &RedactionOptions::default());

    assert!(!output.report.success);
    assert!(output.image.is_none());
    assert!(output.report.matches.is_empty());
    assert_eq!(output.report.errors.len(), 1);
    assert!(output.report.errors[0].contains("scripted failure"));
}

#[test]
fn test_detector_toggles_disable_detection() {
    let make_output = || OcrOutput {
        text: "123 456 782".to_string(),
        words: vec![
            word("123", 100, 80.0),
            word("456", 140, 70.0),
            word("782", 180, 90.0),
        ],
        lines: Vec::new(),
    };

    let image = white_image(800, 400);
    let class = DocumentClass::new(DocumentType::DriversLicense, DocumentSide::Back);
    let options = RedactionOptions {
        redact_bsn: false,
        ..Default::default()
    };

    let mut engine = MockEngine::with(make_output());
    let output = run(&mut engine, &image, class, &options);
    assert!(output.report.matches.is_empty());

    let mut engine = MockEngine::with(make_output());
    let output = run(&mut engine, &image, class, &RedactionOptions::default());
    assert_eq!(output.report.matches.len(), 1);
}

#[test]
fn test_abutting_matches_painted_as_one_region() {
    // BSN box ends at x=134, birth-date box starts at x=136; the two-pixel
    // seam between them must come out black as well.
    let mut engine = MockEngine::with(OcrOutput {
        text: "123456782 geboren 03-07-1985".to_string(),
        words: vec![
            word("123456782", 100, 90.0),
            word("geboren", 300, 90.0),
            word("03-07-1985", 140, 90.0),
        ],
        lines: Vec::new(),
    });

    let image = white_image(800, 400);
    let class = DocumentClass::new(DocumentType::DriversLicense, DocumentSide::Back);
    let output = run(&mut engine, &image, class, &RedactionOptions::default());

    assert_eq!(output.report.matches.len(), 2);
    assert_eq!(
        output
            .report
            .matches
            .iter()
            .filter(|m| m.kind == MatchKind::DateOfBirth)
            .count(),
        1
    );

    let redacted = output.image.unwrap();
    assert_eq!(*redacted.get_pixel(134, 60), BLACK);
    assert_eq!(*redacted.get_pixel(135, 60), BLACK);
    assert_eq!(*redacted.get_pixel(94, 60), WHITE);
    assert_eq!(*redacted.get_pixel(176, 60), WHITE);
}

#[test]
fn test_masked_text_never_contains_full_value() {
    let mut engine = MockEngine::with(OcrOutput {
        text: "123456782".to_string(),
        words: vec![word("123456782", 100, 90.0)],
        lines: Vec::new(),
    });

    let image = white_image(800, 400);
    let class = DocumentClass::new(DocumentType::DriversLicense, DocumentSide::Back);
    let output = run(&mut engine, &image, class, &RedactionOptions::default());

    for m in &output.report.matches {
        assert!(!m.text.contains("123456782"));
    }
    let json = serde_json::to_string(&output.report).unwrap();
    assert!(!json.contains("123456782"));
}
