use std::borrow::Cow;
use std::io::Write;

use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage};
use img_parts::png::Png;
use img_parts::{Bytes, ImageEXIF};

use crate::encoders::common::{compact_pixel_format, write_icc, Metadata};
use crate::error::BackendError;

pub fn encode<W: Write>(
    pixels: &DynamicImage,
    writer: &mut W,
    metadata: &Metadata,
) -> Result<(), BackendError> {
    let pixels = to_png_precision(pixels);
    let pixels = compact_pixel_format(&pixels);
    let mut png = Vec::new();
    let mut encoder = PngEncoder::new(&mut png);
    write_icc(&mut encoder, metadata);
    pixels.write_with_encoder(encoder)?;

    match &metadata.exif {
        None => writer.write_all(&png)?,
        Some(exif) => {
            let mut png = Png::from_bytes(Bytes::from(png))?;
            png.set_exif(Some(Bytes::from(exif.clone())));
            png.encoder().write_to(writer)?;
        }
    }
    Ok(())
}

/// PNG tops out at 16 bits per channel integer samples
fn to_png_precision(pixels: &DynamicImage) -> Cow<'_, DynamicImage> {
    match pixels.color() {
        ColorType::Rgb32F => Cow::Owned(DynamicImage::ImageRgb16(pixels.to_rgb16())),
        ColorType::Rgba32F => Cow::Owned(DynamicImage::ImageRgba16(pixels.to_rgba16())),
        _ => Cow::Borrowed(pixels),
    }
}
