use image::imageops::FilterType;

use crate::{image::Image, settings::Size};

/// Scales to exactly `size`, ignoring the aspect ratio
pub fn resize(image: &mut Image, size: Size) {
    if size.width == 0 || size.height == 0 {
        log::debug!("cannot resize to {}x{}, skipping", size.width, size.height);
        return;
    }
    if image.size() == size {
        return;
    }
    image.pixels = image
        .pixels
        .resize_exact(size.width, size.height, FilterType::Lanczos3);
}

#[cfg(test)]
mod tests {
    use image::DynamicImage;

    use super::*;

    #[test]
    fn resizes_exactly() {
        let mut image = Image::new(DynamicImage::new_rgba16(64, 48));
        resize(&mut image, Size::new(16, 30));
        assert_eq!(image.size(), Size::new(16, 30));
        // precision is preserved
        assert!(image.is_high_bit_depth());
    }

    #[test]
    fn zero_size_is_ignored() {
        let mut image = Image::new(DynamicImage::new_rgb8(8, 8));
        resize(&mut image, Size::new(0, 4));
        assert_eq!(image.size(), Size::new(8, 8));
    }
}
