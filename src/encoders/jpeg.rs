use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use img_parts::jpeg::{markers, Jpeg, JpegSegment};
use img_parts::{Bytes, ImageEXIF};

use crate::codec::RasterOptions;
use crate::encoders::common::{background, flatten_alpha, write_icc, Metadata};
use crate::error::BackendError;

const DEFAULT_QUALITY: u8 = 92;

pub fn encode<W: Write>(
    pixels: &DynamicImage,
    writer: &mut W,
    options: &RasterOptions<'_>,
    metadata: &Metadata,
) -> Result<(), BackendError> {
    // JPEG has no alpha channel
    let rgb = flatten_alpha(pixels, background(options));
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality(options.quality));
    write_icc(&mut encoder, metadata);
    rgb.write_with_encoder(encoder)?;

    if metadata.exif.is_none() && metadata.iptc.is_none() {
        writer.write_all(&jpeg)?;
        return Ok(());
    }
    let mut jpeg = Jpeg::from_bytes(Bytes::from(jpeg))?;
    jpeg.set_exif(metadata.exif.clone().map(Bytes::from));
    if let Some(iptc) = &metadata.iptc {
        // right after the other application segments
        let position = jpeg
            .segments()
            .iter()
            .rposition(|segment| (markers::APP0..=markers::APP15).contains(&segment.marker()))
            .map_or(0, |last| last + 1);
        let segment = JpegSegment::new_with_contents(markers::APP13, Bytes::from(iptc.clone()));
        jpeg.segments_mut().insert(position, segment);
    }
    jpeg.encoder().write_to(writer)?;
    Ok(())
}

/// Maps 0.0..=1.0 onto the 1..=100 scale of the encoder
fn quality(quality: Option<f64>) -> u8 {
    match quality {
        Some(q) if !q.is_nan() => (q * 100.0).round().clamp(1.0, 100.0) as u8,
        _ => DEFAULT_QUALITY,
    }
}
