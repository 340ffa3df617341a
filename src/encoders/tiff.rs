use std::borrow::Cow;
use std::io::{Seek, Write};

use image::codecs::tiff::TiffEncoder;
use image::DynamicImage;

use crate::encoders::common::{write_icc, Metadata};
use crate::error::BackendError;

pub fn encode<W: Write + Seek>(
    pixels: &DynamicImage,
    writer: &mut W,
    metadata: &Metadata,
) -> Result<(), BackendError> {
    let pixels = to_tiff_layout(pixels);
    let mut encoder = TiffEncoder::new(writer);
    write_icc(&mut encoder, metadata);
    pixels.write_with_encoder(encoder)?;
    Ok(())
}

/// The TIFF encoder has no gray with alpha layout
fn to_tiff_layout(pixels: &DynamicImage) -> Cow<'_, DynamicImage> {
    match pixels {
        DynamicImage::ImageLumaA8(_) => Cow::Owned(DynamicImage::ImageRgba8(pixels.to_rgba8())),
        DynamicImage::ImageLumaA16(_) => Cow::Owned(DynamicImage::ImageRgba16(pixels.to_rgba16())),
        _ => Cow::Borrowed(pixels),
    }
}
