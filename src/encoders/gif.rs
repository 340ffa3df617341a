use std::io::Write;

use image::codecs::gif::GifEncoder;
use image::{DynamicImage, ExtendedColorType};

use crate::encoders::common::to_8bit_rgb;
use crate::error::BackendError;

pub fn encode<W: Write>(pixels: &DynamicImage, writer: &mut W) -> Result<(), BackendError> {
    let mut encoder = GifEncoder::new_with_speed(writer, 10);
    let (width, height) = (pixels.width(), pixels.height());
    // the GIF encoder only takes 8-bit RGB(A) buffers
    match to_8bit_rgb(pixels).as_ref() {
        DynamicImage::ImageRgb8(rgb) => {
            encoder.encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?
        }
        other => {
            let rgba = other.to_rgba8();
            encoder.encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)?
        }
    }
    Ok(())
}
