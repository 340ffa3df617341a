//! The set of formats a conversion can produce, and how one is picked
//! when the caller does not name it.

use std::ffi::OsStr;

use strum::VariantArray;

use crate::error::ConvertError;

#[cfg(test)]
use quickcheck::Arbitrary;

/// Output image format.
///
/// Declaration order is the registry order: when two formats share a type identifier
/// or an extension, the one declared first wins.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::VariantArray,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Ico,
    Tiff,
    Heic,
    Heif,
    /// 10-bit HEIF. Normally derived from `Heif` and a high bit depth source,
    /// see [ImageFormat::for_bit_depth].
    Heif10,
    /// Only recognized with the `jpeg2000` feature
    Jpeg2000,
}

#[cfg(test)]
impl Arbitrary for ImageFormat {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(Self::VARIANTS).unwrap()
    }
}

impl ImageFormat {
    /// Codec type identifier, in MIME form
    pub fn type_identifier(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Ico => "image/x-icon",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Heic => "image/heic",
            ImageFormat::Heif | ImageFormat::Heif10 => "image/heif",
            ImageFormat::Jpeg2000 => "image/jp2",
        }
    }

    /// Recognized file extensions, preferred one first
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            ImageFormat::Png => &["png"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::Bmp => &["bmp"],
            ImageFormat::Ico => &["ico"],
            ImageFormat::Tiff => &["tiff", "tif"],
            ImageFormat::Heic => &["heic"],
            ImageFormat::Heif => &["heif", "hif"],
            // never inferred from a filename
            ImageFormat::Heif10 => &[],
            ImageFormat::Jpeg2000 => &["jp2", "j2k", "jpf", "jpx"],
        }
    }

    pub fn preferred_extension(self) -> Option<&'static str> {
        self.extensions().first().copied()
    }

    /// Whether this build can produce the format at all
    pub fn is_available(self) -> bool {
        match self {
            ImageFormat::Jpeg2000 => cfg!(feature = "jpeg2000"),
            _ => true,
        }
    }

    /// HEIF variants are written through the filter-graph pathway
    pub fn is_heif_family(self) -> bool {
        matches!(self, ImageFormat::Heif | ImageFormat::Heif10)
    }

    /// The equivalent format of the `image` crate, if it has one
    pub fn codec_format(self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Gif => Some(image::ImageFormat::Gif),
            ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
            ImageFormat::Ico => Some(image::ImageFormat::Ico),
            ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
            ImageFormat::Heic
            | ImageFormat::Heif
            | ImageFormat::Heif10
            | ImageFormat::Jpeg2000 => None,
        }
    }

    fn registry() -> impl Iterator<Item = ImageFormat> {
        Self::VARIANTS.iter().copied().filter(|f| f.is_available())
    }

    pub fn from_type_identifier(identifier: &str) -> Option<Self> {
        Self::registry().find(|f| f.type_identifier().eq_ignore_ascii_case(identifier))
    }

    pub fn from_extension(extension: &OsStr) -> Option<Self> {
        let extension = extension.to_str()?;
        Self::registry().find(|f| {
            f.extensions()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
    }

    /// Picks the output format.
    ///
    /// An explicit choice always wins. Otherwise the type the source was decoded as
    /// is preferred over the destination extension, which is often just a filename artifact.
    pub fn resolve(
        explicit: Option<ImageFormat>,
        source_type: Option<&str>,
        destination_extension: Option<&OsStr>,
    ) -> Result<ImageFormat, ConvertError> {
        if let Some(format) = explicit {
            if !format.is_available() {
                log::debug!("explicitly requested {format} is not available in this build");
                return Err(ConvertError::UnsupportedFormat);
            }
            return Ok(format);
        }
        if let Some(format) = source_type.and_then(Self::from_type_identifier) {
            log::debug!("using source image type {format}");
            return Ok(format);
        }
        if let Some(format) = destination_extension.and_then(Self::from_extension) {
            log::debug!("using destination extension to pick {format}");
            return Ok(format);
        }
        Err(ConvertError::UnsupportedFormat)
    }

    /// Plain HEIF is written as 10-bit HEIF when the source has more than 8 bits per channel.
    pub fn for_bit_depth(self, high_bit_depth: bool) -> ImageFormat {
        if self == ImageFormat::Heif && high_bit_depth {
            log::debug!("high bit depth source, upgrading heif to heif10");
            ImageFormat::Heif10
        } else {
            self
        }
    }
}
