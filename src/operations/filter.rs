use crate::image::Image;

/// Per-pixel color adjustments
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorFilter {
    Grayscale,
    Invert,
}

pub fn apply(image: &mut Image, filter: ColorFilter) {
    match filter {
        // image-rs uses Rec. 709 luma weights for most pixel types
        ColorFilter::Grayscale => image.pixels = image.pixels.grayscale(),
        ColorFilter::Invert => image.pixels.invert(),
    }
}
