//! The default back-end, built on the `image` crate.
//!
//! It has no HEIF encoder: HEIF-family output needs a [FilterGraphWriter] from another back-end.

mod common;
#[cfg(feature = "gif")]
mod gif;
#[cfg(feature = "jpeg")]
mod jpeg;
#[cfg(feature = "png")]
mod png;
mod raster;
#[cfg(feature = "tiff")]
mod tiff;

use std::{
    borrow::Cow,
    io::{Seek, Write},
    path::Path,
};

pub use raster::RasterFile;

use crate::{
    codec::{
        ColorSpace, Decoder, EditApplier, FilterGraphWriter, FilterImage, HeifOptions,
        PixelFormat, RasterOptions, RasterWriter,
    },
    error::BackendError,
    format::ImageFormat,
    image::Image,
};
use common::Metadata;

#[derive(Debug, Default, Copy, Clone)]
pub struct ImageCodec;

impl Decoder for ImageCodec {
    fn decode(&self, path: &Path) -> Result<Image, BackendError> {
        crate::decode::decode(path)
    }
}

impl EditApplier for ImageCodec {}

impl RasterWriter for ImageCodec {
    type Destination = RasterFile;

    fn create(&self, path: &Path, format: ImageFormat) -> Result<RasterFile, BackendError> {
        RasterFile::create(path, format)
    }
}

impl FilterGraphWriter for ImageCodec {
    fn write_heif(
        &self,
        _image: &FilterImage<'_>,
        path: &Path,
        _format: PixelFormat,
        _color_space: ColorSpace,
        _options: &HeifOptions,
    ) -> Result<(), BackendError> {
        Err(format!("no HEIF encoder available to write {}", path.display()).into())
    }

    fn write_heif10(
        &self,
        _image: &FilterImage<'_>,
        path: &Path,
        _color_space: ColorSpace,
        _options: &HeifOptions,
    ) -> Result<(), BackendError> {
        Err(format!("no 10-bit HEIF encoder available to write {}", path.display()).into())
    }

    fn supports_heif10(&self) -> bool {
        false
    }
}

/// Encodes one image in `format` with its metadata.
pub(crate) fn write_image<W: Write + Seek>(
    writer: &mut W,
    image: &Image,
    format: ImageFormat,
    options: &RasterOptions<'_>,
) -> Result<(), BackendError> {
    let metadata = Metadata::collect(image, format, options);
    let pixels = if options.optimize_color_for_sharing {
        common::to_8bit(&image.pixels)
    } else {
        Cow::Borrowed(&image.pixels)
    };

    match format {
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => {
            common::report_dropped(&metadata, format, true, true);
            jpeg::encode(&pixels, writer, options, &metadata)
        }
        #[cfg(feature = "png")]
        ImageFormat::Png => {
            common::report_dropped(&metadata, format, true, false);
            png::encode(&pixels, writer, &metadata)
        }
        #[cfg(feature = "gif")]
        ImageFormat::Gif => {
            common::report_dropped(&metadata, format, false, false);
            gif::encode(&pixels, writer)
        }
        #[cfg(feature = "tiff")]
        ImageFormat::Tiff => {
            common::report_dropped(&metadata, format, false, false);
            tiff::encode(&pixels, writer, &metadata)
        }
        _ => {
            let codec_format = format
                .codec_format()
                .ok_or_else(|| format!("no {format} encoder in this build"))?;
            common::report_dropped(&metadata, format, false, false);
            common::to_8bit_rgb(&pixels).write_to(writer, codec_format)?;
            Ok(())
        }
    }
}
