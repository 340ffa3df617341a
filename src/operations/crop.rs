use crate::{image::Image, settings::Rect};

/// Cuts out `rect`, clamped to the image bounds.
/// A rectangle that lies entirely outside the image leaves it untouched.
pub fn crop(image: &mut Image, rect: &Rect) {
    let (width, height) = (image.pixels.width(), image.pixels.height());
    if rect.x >= width || rect.y >= height || rect.width == 0 || rect.height == 0 {
        log::debug!("crop {rect:?} is outside of the {width}x{height} image, skipping");
        return;
    }
    let crop_width = rect.width.min(width - rect.x);
    let crop_height = rect.height.min(height - rect.y);
    image.pixels = image.pixels.crop_imm(rect.x, rect.y, crop_width, crop_height);
}
