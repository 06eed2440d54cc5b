//! Template fallback zones and match reconciliation.
//!
//! OCR on phone photos misses fields routinely, so every document layout
//! carries a table of zones that must end up covered no matter what the
//! detectors found. Reconciliation checks each zone against the collected
//! matches and fills the gaps with fixed template regions. Aggressive mode
//! goes one step further for driving-licence fronts: the field-5 block
//! (BSN and licence number share it) is redacted unconditionally.

use proefrit_detect::{
    MatchKind, RedactionMatch, AGGRESSIVE_REASON_PREFIX, FALLBACK_REASON_PREFIX,
};
use proefrit_geometry::{PercentBox, PixelBox};

use crate::{DocumentClass, DocumentSide, DocumentType};

/// Minimum overlap ratio for a match to count as covering a zone.
pub const COVERAGE_THRESHOLD: f64 = 0.3;

/// One template zone: where a sensitive field sits on a given layout.
#[derive(Debug, Clone, Copy)]
pub struct FallbackZone {
    pub label: &'static str,
    pub kind: MatchKind,
    pub area: PercentBox,
    /// Forced unconditionally in aggressive mode.
    pub mandatory: bool,
}

const ID_FRONT: &[FallbackZone] = &[
    FallbackZone {
        label: "BSN",
        kind: MatchKind::Bsn,
        area: PercentBox::new(55.0, 72.0, 40.0, 10.0),
        mandatory: false,
    },
    FallbackZone {
        label: "documentnummer",
        kind: MatchKind::DocumentNumber,
        area: PercentBox::new(55.0, 58.0, 40.0, 10.0),
        mandatory: false,
    },
];

const ID_BACK: &[FallbackZone] = &[
    FallbackZone {
        label: "MRZ",
        kind: MatchKind::Mrz,
        area: PercentBox::new(2.0, 62.0, 96.0, 34.0),
        mandatory: false,
    },
    FallbackZone {
        label: "BSN",
        kind: MatchKind::Bsn,
        area: PercentBox::new(5.0, 8.0, 45.0, 12.0),
        mandatory: false,
    },
];

const DRIVERS_LICENSE_FRONT: &[FallbackZone] = &[
    // Field 5 holds the licence number and, on Dutch licences, the BSN.
    FallbackZone {
        label: "BSN en rijbewijsnummer (punt 5)",
        kind: MatchKind::Bsn,
        area: PercentBox::new(25.0, 78.0, 70.0, 14.0),
        mandatory: true,
    },
    FallbackZone {
        label: "geboortedatum (punt 3)",
        kind: MatchKind::DateOfBirth,
        area: PercentBox::new(30.0, 38.0, 35.0, 9.0),
        mandatory: false,
    },
];

const PASSPORT_FRONT: &[FallbackZone] = &[
    FallbackZone {
        label: "MRZ",
        kind: MatchKind::Mrz,
        area: PercentBox::new(2.0, 72.0, 96.0, 24.0),
        mandatory: false,
    },
    FallbackZone {
        label: "documentnummer",
        kind: MatchKind::DocumentNumber,
        area: PercentBox::new(60.0, 12.0, 35.0, 9.0),
        mandatory: false,
    },
    FallbackZone {
        label: "BSN",
        kind: MatchKind::Bsn,
        area: PercentBox::new(55.0, 55.0, 40.0, 10.0),
        mandatory: false,
    },
];

// Unknown layouts get wide safety bands instead of field-level zones.
const UNKNOWN: &[FallbackZone] = &[
    FallbackZone {
        label: "onderste band",
        kind: MatchKind::Mrz,
        area: PercentBox::new(0.0, 65.0, 100.0, 35.0),
        mandatory: false,
    },
    FallbackZone {
        label: "nummerband rechtsboven",
        kind: MatchKind::DocumentNumber,
        area: PercentBox::new(50.0, 5.0, 50.0, 12.0),
        mandatory: false,
    },
];

/// Fallback zones for a document layout. Empty for layouts without
/// printed sensitive fields (driving-licence backs, passport backs).
pub fn zones_for(class: DocumentClass) -> &'static [FallbackZone] {
    match (class.doc_type, class.side) {
        (DocumentType::Id, DocumentSide::Front) => ID_FRONT,
        (DocumentType::Id, DocumentSide::Back) => ID_BACK,
        (DocumentType::DriversLicense, DocumentSide::Front) => DRIVERS_LICENSE_FRONT,
        (DocumentType::DriversLicense, DocumentSide::Back) => &[],
        (DocumentType::Passport, DocumentSide::Front) => PASSPORT_FRONT,
        (DocumentType::Passport, DocumentSide::Back) => &[],
        (DocumentType::Unknown, _) => UNKNOWN,
    }
}

/// Reconcile detector matches against the layout's fallback zones.
///
/// Every zone either has a covering match (overlap ratio at or above
/// [`COVERAGE_THRESHOLD`]) or gets a template match appended. With
/// `aggressive` set, mandatory zones are forced regardless of coverage;
/// fallback matches they supersede are dropped. Running reconciliation
/// twice on the same list adds nothing the second time.
pub fn reconcile(
    matches: &mut Vec<RedactionMatch>,
    class: DocumentClass,
    img_width: u32,
    img_height: u32,
    aggressive: bool,
) {
    for zone in zones_for(class) {
        let bbox = zone.area.to_pixels(img_width, img_height);
        if bbox.is_empty() {
            continue;
        }

        if aggressive && zone.mandatory {
            force_zone(matches, zone, bbox, class);
            continue;
        }

        // OCR evidence and earlier fallback passes cover a zone; a photo
        // template match is a layout guess and does not.
        let covered = matches
            .iter()
            .filter(|m| m.kind != MatchKind::Face)
            .any(|m| m.bbox.overlap_ratio(&bbox) >= COVERAGE_THRESHOLD);
        if covered {
            log::debug!("[Fallback] zone '{}' already covered", zone.label);
            continue;
        }

        log::info!(
            "[Fallback] zone '{}' uncovered on {}, adding template region {:?}",
            zone.label,
            class.key(),
            bbox
        );
        matches.push(RedactionMatch {
            kind: zone.kind,
            text: String::new(),
            bbox,
            confidence: 1.0,
            reason: format!("{}: {}", FALLBACK_REASON_PREFIX, zone.label),
        });
    }
}

fn force_zone(
    matches: &mut Vec<RedactionMatch>,
    zone: &FallbackZone,
    bbox: PixelBox,
    class: DocumentClass,
) {
    let reason = format!("{}: {}", AGGRESSIVE_REASON_PREFIX, zone.label);

    // Already forced in an earlier pass.
    if matches.iter().any(|m| m.bbox == bbox && m.reason == reason) {
        return;
    }

    // The forced region supersedes any template match overlapping it;
    // detector matches carry OCR evidence and stay.
    matches.retain(|m| !(m.is_fallback() && m.bbox.overlap_ratio(&bbox) >= COVERAGE_THRESHOLD));

    log::info!(
        "[Fallback] forcing zone '{}' on {} at {:?}",
        zone.label,
        class.key(),
        bbox
    );
    matches.push(RedactionMatch {
        kind: zone.kind,
        text: String::new(),
        bbox,
        confidence: 1.0,
        reason,
    });
}
