//! Helpers shared between all encoders

use std::borrow::Cow;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, Rgb, RgbImage};
use log::debug;

use crate::codec::{Bgra, RasterOptions};
use crate::format::ImageFormat;
use crate::image::Image;
use crate::metadata::{Properties, PropertyCategory};

mod pixel_format_optimization;

pub(crate) use pixel_format_optimization::{compact_pixel_format, to_8bit, to_8bit_rgb};

/// Longest side of an embedded thumbnail
const THUMBNAIL_SIZE: u32 = 160;
const THUMBNAIL_QUALITY: u8 = 75;

/// Largest payload of a single JPEG segment
const JPEG_SEGMENT_CAPACITY: usize = 65533;
/// `Exif\0\0` in front of the blob in an APP1 segment
const JPEG_EXIF_HEADER_LEN: usize = 6;

/// Categories serialized into the EXIF blob
const EXIF_CATEGORIES: [PropertyCategory; 4] = [
    PropertyCategory::Gps,
    PropertyCategory::Exif,
    PropertyCategory::Tiff,
    PropertyCategory::MakerNote,
];

/// What gets embedded next to the pixels, already in the form the containers store it
#[derive(Debug, Default)]
pub(crate) struct Metadata {
    pub exif: Option<Vec<u8>>,
    pub iptc: Option<Vec<u8>>,
    pub icc: Option<Vec<u8>>,
}

impl Metadata {
    pub fn collect(image: &Image, format: ImageFormat, options: &RasterOptions<'_>) -> Self {
        let icc = if options.optimize_color_for_sharing {
            None
        } else {
            image.icc.clone()
        };
        let is_jpeg = format == ImageFormat::Jpeg;
        let thumbnail = (options.embed_thumbnail && is_jpeg)
            .then(|| thumbnail(&image.pixels, background(options)))
            .flatten();
        // JPEG stores each payload in one length-prefixed segment
        let exif_capacity = is_jpeg.then_some(JPEG_SEGMENT_CAPACITY - JPEG_EXIF_HEADER_LEN);
        let iptc_capacity = is_jpeg.then_some(JPEG_SEGMENT_CAPACITY);
        Metadata {
            exif: exif_blob(options, thumbnail.as_deref(), exif_capacity),
            iptc: options
                .property(PropertyCategory::Iptc)
                .and_then(Properties::raw)
                .filter(|iptc| {
                    let fitting = fits(iptc, iptc_capacity);
                    if !fitting {
                        debug!("dropping IPTC properties, {} bytes do not fit", iptc.len());
                    }
                    fitting
                })
                .map(<[u8]>::to_vec),
            icc,
        }
    }
}

fn fits(payload: &[u8], capacity: Option<usize>) -> bool {
    capacity.map_or(true, |capacity| payload.len() <= capacity)
}

fn exif_blob(
    options: &RasterOptions<'_>,
    thumbnail: Option<&[u8]>,
    capacity: Option<usize>,
) -> Option<Vec<u8>> {
    let fields: Vec<&exif::Field> = EXIF_CATEGORIES
        .into_iter()
        .filter_map(|category| options.property(category))
        .flat_map(Properties::fields)
        .collect();
    if let Some(jpeg) = thumbnail {
        match crate::exif::write_blob(&fields, Some(jpeg)) {
            Ok(blob) if fits(&blob, capacity) => return Some(blob),
            Ok(blob) => debug!("dropping the thumbnail, EXIF would grow to {} bytes", blob.len()),
            Err(error) => debug!("dropping the thumbnail, EXIF cannot hold it: {error}"),
        }
    }
    if fields.is_empty() {
        return None;
    }
    match crate::exif::write_blob(&fields, None) {
        Ok(blob) if fits(&blob, capacity) => Some(blob),
        Ok(blob) => {
            debug!("dropping EXIF properties, {} bytes do not fit", blob.len());
            None
        }
        Err(error) => {
            debug!("dropping EXIF properties: {error}");
            None
        }
    }
}

/// The matte for formats without transparency, white unless the caller picked one
pub(crate) fn background(options: &RasterOptions<'_>) -> Bgra {
    options.background_color.unwrap_or(Bgra([1.0, 1.0, 1.0, 1.0]))
}

/// Small JPEG preview of the image
fn thumbnail(pixels: &DynamicImage, matte: Bgra) -> Option<Vec<u8>> {
    let small = pixels.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
    let rgb = flatten_alpha(&small, matte);
    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, THUMBNAIL_QUALITY);
    match rgb.write_with_encoder(encoder) {
        Ok(()) => Some(jpeg),
        Err(error) => {
            debug!("skipping thumbnail: {error}");
            None
        }
    }
}

/// Composites translucent pixels over the matte color, producing 8-bit RGB.
pub(crate) fn flatten_alpha(pixels: &DynamicImage, matte: Bgra) -> Cow<'_, DynamicImage> {
    if matches!(pixels, DynamicImage::ImageRgb8(_)) {
        return Cow::Borrowed(pixels);
    }
    if !pixels.color().has_alpha() {
        return Cow::Owned(DynamicImage::ImageRgb8(pixels.to_rgb8()));
    }
    let [blue, green, red, _] = matte.0;
    let matte = [red, green, blue].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u32);
    let rgba = pixels.to_rgba8();
    let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let pixel = rgba.get_pixel(x, y).0;
        let alpha = pixel[3] as u32;
        Rgb(std::array::from_fn(|c| {
            ((pixel[c] as u32 * alpha + matte[c] * (255 - alpha) + 127) / 255) as u8
        }))
    });
    Cow::Owned(DynamicImage::ImageRgb8(flattened))
}

/// Sets the ICC profile on encoders that support one
pub(crate) fn write_icc(encoder: &mut impl ImageEncoder, metadata: &Metadata) {
    if let Some(icc) = metadata.icc.clone() {
        if encoder.set_icc_profile(icc).is_err() {
            debug!("encoder does not support ICC profiles, dropping it");
        }
    }
}

/// Logs the metadata a container has no place for
pub(crate) fn report_dropped(metadata: &Metadata, format: ImageFormat, exif: bool, iptc: bool) {
    if metadata.exif.is_some() && !exif {
        debug!("{format} cannot hold EXIF properties, dropping them");
    }
    if metadata.iptc.is_some() && !iptc {
        debug!("{format} cannot hold IPTC properties, dropping them");
    }
}
