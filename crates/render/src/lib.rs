//! Opaque redaction rendering.
//!
//! Matched regions are painted as solid filled rectangles directly on the
//! decoded image, then the result is re-encoded. Solid fill is the point:
//! blurring or pixelation can be partially reversed, a flat rectangle
//! cannot.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use thiserror::Error;

use proefrit_geometry::PixelBox;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Paint every box as an opaque filled rectangle.
///
/// Boxes are clamped to the image bounds; regions that fall entirely
/// outside are skipped.
pub fn redact_regions(image: &mut RgbaImage, boxes: &[PixelBox], color: [u8; 3]) {
    let (img_width, img_height) = image.dimensions();
    let fill = Rgba([color[0], color[1], color[2], 255]);

    let mut painted = 0usize;
    for b in boxes {
        let x = b.x.min(img_width);
        let y = b.y.min(img_height);
        let width = b.width.min(img_width - x);
        let height = b.height.min(img_height - y);

        if width == 0 || height == 0 {
            log::debug!("[Render] skipping out-of-bounds region {:?}", b);
            continue;
        }

        draw_filled_rect_mut(
            image,
            Rect::at(x as i32, y as i32).of_size(width, height),
            fill,
        );
        painted += 1;
    }

    log::info!("[Render] painted {} of {} regions", painted, boxes.len());
}

/// Encode the redacted image as JPEG at the given quality.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, RenderError> {
    // JPEG has no alpha channel, flatten first.
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();

    let mut buf = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(std::io::Cursor::new(&mut buf), quality);
    rgb.write_with_encoder(encoder)?;
    Ok(buf)
}
