//! Bounding-box geometry for redaction regions.
//!
//! Two box types, never mixed: `PixelBox` in image pixels (OCR output,
//! renderer input) and `PercentBox` in 0-100 percent of the image
//! (template zones). Conversion to pixels is explicit and requires the
//! real image dimensions.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel units, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Intersection of two boxes, `None` when they do not overlap.
    pub fn intersection(&self, other: &PixelBox) -> Option<PixelBox> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= x || bottom <= y {
            return None;
        }

        Some(PixelBox::new(x, y, right - x, bottom - y))
    }

    /// Overlap ratio: intersection area over the smaller of the two areas.
    ///
    /// Symmetric. Identical boxes yield 1.0, disjoint or empty boxes 0.0.
    pub fn overlap_ratio(&self, other: &PixelBox) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let inter = match self.intersection(other) {
            Some(b) => b.area(),
            None => return 0.0,
        };
        inter as f64 / self.area().min(other.area()) as f64
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &PixelBox) -> PixelBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        PixelBox::new(x, y, right - x, bottom - y)
    }

    /// Expand on all sides by `pad` pixels, saturating at the origin.
    ///
    /// The renderer clamps to the image, so no upper bound is applied here.
    pub fn padded(&self, pad: u32) -> PixelBox {
        let x = self.x.saturating_sub(pad);
        let y = self.y.saturating_sub(pad);
        PixelBox::new(
            x,
            y,
            self.width + pad + (self.x - x),
            self.height + pad + (self.y - y),
        )
    }
}

/// Smallest box containing every input box.
pub fn union_all(boxes: &[PixelBox]) -> Option<PixelBox> {
    let mut iter = boxes.iter();
    let first = *iter.next()?;
    Some(iter.fold(first, |acc, b| acc.union(b)))
}

/// Coalesce boxes separated by less than `gap` pixels in both axes.
///
/// Repeats until stable so chains of adjacent word boxes collapse into one
/// region.
pub fn merge_nearby(mut boxes: Vec<PixelBox>, gap: u32) -> Vec<PixelBox> {
    loop {
        let mut merged_any = false;
        let mut merged: Vec<PixelBox> = Vec::with_capacity(boxes.len());

        'outer: for b in boxes.drain(..) {
            for m in merged.iter_mut() {
                if m.padded(gap).overlap_ratio(&b) > 0.0 {
                    *m = m.union(&b);
                    merged_any = true;
                    continue 'outer;
                }
            }
            merged.push(b);
        }

        boxes = merged;
        if !merged_any {
            return boxes;
        }
    }
}

/// Axis-aligned rectangle in percent of the image (0-100), top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PercentBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to pixels against the real image dimensions.
    pub fn to_pixels(&self, img_width: u32, img_height: u32) -> PixelBox {
        let x = (self.x / 100.0 * img_width as f32).round().max(0.0) as u32;
        let y = (self.y / 100.0 * img_height as f32).round().max(0.0) as u32;
        let width = (self.width / 100.0 * img_width as f32).round().max(0.0) as u32;
        let height = (self.height / 100.0 * img_height as f32).round().max(0.0) as u32;
        PixelBox::new(x.min(img_width), y.min(img_height), width, height)
    }
}
