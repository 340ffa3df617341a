use std::{fs, io::Cursor, path::Path};

use image::{DynamicImage, ImageDecoder, ImageReader};
use img_parts::{
    jpeg::{markers, Jpeg},
    Bytes,
};

use crate::{error::BackendError, image::Image};

/// Photoshop image resource block header that IPTC data travels in
const PHOTOSHOP_SIGNATURE: &[u8] = b"Photoshop 3.0\0";

/// Decodes the first frame of the file, guessing the format from its contents.
///
/// Besides the pixels this records everything needed to carry metadata over:
/// the detected type, the raw EXIF blob, the ICC profile and, for JPEG, the IPTC block.
pub fn decode(path: &Path) -> Result<Image, BackendError> {
    let bytes = Bytes::from(fs::read(path)?);
    let reader = ImageReader::new(Cursor::new(&bytes[..])).with_guessed_format()?;
    let format = reader
        .format()
        .ok_or("unrecognized image container")?;
    let mut decoder = reader.into_decoder()?;
    // a broken profile should not prevent decoding the pixels
    let icc = decoder.icc_profile().ok().flatten();
    let pixels = DynamicImage::from_decoder(decoder)?;

    let mut image = Image::new(pixels);
    image.type_identifier = Some(format.to_mime_type().to_owned());
    image.icc = icc;
    image.exif = crate::exif::read_from_container(&bytes);
    if format == image::ImageFormat::Jpeg {
        image.iptc = read_iptc(bytes);
    }
    Ok(image)
}

fn read_iptc(jpeg: Bytes) -> Option<Vec<u8>> {
    let jpeg = Jpeg::from_bytes(jpeg).ok()?;
    jpeg.segments()
        .iter()
        .filter(|segment| segment.marker() == markers::APP13)
        .map(|segment| segment.contents())
        .find(|contents| contents.starts_with(PHOTOSHOP_SIGNATURE))
        .map(|contents| contents.to_vec())
}
