//! Interfaces to the codec library doing the actual pixel work.
//!
//! A conversion needs a decoder, an edit applier and two writers: a generic raster
//! writer configured through [RasterOptions], and a filter-graph writer for the HEIF family.
//! [crate::encoders::ImageCodec] implements all of them on top of the `image` crate.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use image::DynamicImage;

use crate::{
    error::BackendError,
    format::ImageFormat,
    image::Image,
    metadata::{MetadataBag, Properties, PropertyCategory},
    operations::{self, EditSet},
    settings::Color,
};

pub trait Decoder {
    /// Decodes the first frame of the file at `path`
    fn decode(&self, path: &Path) -> Result<Image, BackendError>;

    /// Collects the properties the source carried
    fn copy_properties(&self, image: &Image) -> Result<MetadataBag, BackendError> {
        MetadataBag::capture(image)
    }
}

pub trait EditApplier {
    fn apply_edits(&self, mut image: Image, edits: &EditSet) -> Image {
        operations::apply(&mut image, edits);
        image
    }
}

/// Writes one file through a set of options, reporting success only at the end.
pub trait RasterWriter {
    type Destination: RasterDestination;

    /// Opens a destination for `format`. Fails if the format cannot be written to `path`.
    fn create(&self, path: &Path, format: ImageFormat) -> Result<Self::Destination, BackendError>;
}

pub trait RasterDestination {
    fn add_image(&mut self, image: &Image, options: &RasterOptions<'_>);

    /// Writes everything out. `false` means nothing usable was written.
    fn finalize(self) -> bool;
}

/// Color in blue-green-red-alpha component order, as raster writers expect it
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bgra(pub [f64; 4]);

impl From<Color> for Bgra {
    /// The source alpha is not carried; the matte is always opaque.
    fn from(color: Color) -> Self {
        Bgra([color.blue, color.green, color.red, 1.0])
    }
}

#[derive(Debug, Clone, Default)]
pub struct RasterOptions<'a> {
    pub embed_thumbnail: bool,
    pub optimize_color_for_sharing: bool,
    pub quality: Option<f64>,
    pub background_color: Option<Bgra>,
    /// Only the allow-listed categories, see [PropertyCategory::FORWARDED]
    pub properties: BTreeMap<PropertyCategory, &'a Properties>,
}

impl<'a> RasterOptions<'a> {
    pub fn property(&self, category: PropertyCategory) -> Option<&'a Properties> {
        self.properties.get(&category).copied()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    /// 16 bits per channel RGBA
    Rgba16,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
    /// sRGB primaries with values allowed outside of 0.0..=1.0
    ExtendedSrgb,
}

/// Filter-graph writers take the quality and nothing else
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct HeifOptions {
    pub quality: Option<f64>,
}

/// The image as it enters a filter graph: oriented for display,
/// with the captured properties attached.
#[derive(Debug, Clone)]
pub struct FilterImage<'a> {
    pixels: Cow<'a, DynamicImage>,
    icc: Option<&'a [u8]>,
    properties: Option<&'a MetadataBag>,
}

impl<'a> FilterImage<'a> {
    /// Without properties there is no orientation to apply.
    pub fn new(image: &'a Image, properties: Option<&'a MetadataBag>) -> Self {
        let pixels = match properties.and_then(crate::exif::orientation) {
            Some(orientation) => crate::exif::apply_orientation(&image.pixels, orientation),
            None => Cow::Borrowed(&image.pixels),
        };
        Self {
            pixels,
            icc: image.icc.as_deref(),
            properties,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn icc_profile(&self) -> Option<&'a [u8]> {
        self.icc
    }

    pub fn properties(&self) -> Option<&'a MetadataBag> {
        self.properties
    }

    pub fn render(&self, format: PixelFormat) -> DynamicImage {
        match format {
            PixelFormat::Rgba16 => DynamicImage::ImageRgba16(self.pixels.to_rgba16()),
        }
    }
}

pub trait FilterGraphWriter {
    fn write_heif(
        &self,
        image: &FilterImage<'_>,
        path: &Path,
        format: PixelFormat,
        color_space: ColorSpace,
        options: &HeifOptions,
    ) -> Result<(), BackendError>;

    /// True 10-bit HEIF output, only called when [FilterGraphWriter::supports_heif10] holds
    fn write_heif10(
        &self,
        image: &FilterImage<'_>,
        path: &Path,
        color_space: ColorSpace,
        options: &HeifOptions,
    ) -> Result<(), BackendError>;

    fn supports_heif10(&self) -> bool;
}

/// Everything a conversion needs from the codec library
pub trait Codec: Decoder + EditApplier + RasterWriter + FilterGraphWriter {}

impl<T> Codec for T where T: Decoder + EditApplier + RasterWriter + FilterGraphWriter {}
