use image::DynamicImage;

use crate::format::ImageFormat;
use crate::settings::Size;

/// A decoded image together with the raw metadata its container carried.
#[derive(Debug, Clone)]
pub struct Image {
    pub pixels: DynamicImage,
    /// Codec type identifier the source was decoded as, e.g. `image/png`
    pub type_identifier: Option<String>,
    /// Raw EXIF (TIFF structure, no `Exif\0\0` prefix)
    pub exif: Option<Vec<u8>>,
    /// Raw IPTC / Photoshop resource block
    pub iptc: Option<Vec<u8>>,
    pub icc: Option<Vec<u8>>,
}

impl Image {
    pub fn new(pixels: DynamicImage) -> Self {
        Self {
            pixels,
            type_identifier: None,
            exif: None,
            iptc: None,
            icc: None,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }

    /// More than 8 bits per channel
    pub fn is_high_bit_depth(&self) -> bool {
        let color_type = self.pixels.color();
        color_type.bits_per_pixel() / color_type.channel_count() as u16 > 8
    }
}

/// Summary of a finished conversion
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    /// Dimensions of the image that was encoded, after edits
    pub size: Size,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_bit_images_are_high_bit_depth() {
        let rgb8 = Image::new(DynamicImage::new_rgb8(2, 2));
        assert!(!rgb8.is_high_bit_depth());
        let luma_alpha8 = Image::new(DynamicImage::new_luma_a8(2, 2));
        assert!(!luma_alpha8.is_high_bit_depth());
        let rgba16 = Image::new(DynamicImage::new_rgba16(2, 2));
        assert!(rgba16.is_high_bit_depth());
        let rgb32f = Image::new(DynamicImage::new_rgb32f(2, 2));
        assert!(rgb32f.is_high_bit_depth());
    }
}
